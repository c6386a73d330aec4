// File: src/api.rs
// Purpose: Demo route tree: caller identification, an admin area, a small user API

use conroute::{routes, Context, Routable, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

/// Root of the demo tree
///
/// | Route                    | From                  |
/// |--------------------------|-----------------------|
/// | `GET /ping`              | `Auth::GetPing`       |
/// | `GET /admin/data`        | `Admin::GetData`      |
/// | `GET /api/v1/users`      | `Users::GetUsers`     |
/// | `GET /api/v1/user/:id`   | `Users::GetUser_1id`  |
/// | `POST /api/v1/user`      | `Users::PostUser`     |
/// | `GET /code`              | `Auth::StaticFileCode`|
#[derive(Clone, Default, Routable)]
#[router(fields_only)]
pub struct Site {
    #[router(embed)]
    auth: Auth,
    #[router("admin")]
    admin: Admin,
    #[router("api/v1")]
    users: Users,
}

impl Site {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Identifies the caller from `X-User` or `?uid=`
#[derive(Clone, Default, Routable)]
pub struct Auth;

#[routes]
impl Auth {
    fn Use(&self, c: &mut Context) {
        let uid = c
            .header("x-user")
            .or_else(|| c.query("uid"))
            .unwrap_or("visitor")
            .to_string();
        c.set("uid", uid);
    }

    fn GetPing(&self, c: &mut Context) {
        let msg = format!("hello {}", c.get_string("uid"));
        c.json(StatusCode::OK, &json!({ "msg": msg }));
    }

    fn StaticFileCode(&self) -> (&'static str, &'static str) {
        ("/code", concat!(env!("CARGO_MANIFEST_DIR"), "/src/main.rs"))
    }
}

#[derive(Clone, Default, Routable)]
pub struct Admin;

#[routes]
impl Admin {
    fn Use(&self, c: &mut Context) {
        if c.get_string("uid") != "admin" {
            c.abort_with_json(StatusCode::UNAUTHORIZED, &json!({ "error": "admin only" }));
        }
    }

    fn GetData(&self, c: &mut Context) {
        c.string(StatusCode::OK, "some important data.");
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Deserialize)]
struct NewUser {
    name: String,
}

/// In-memory user store
#[derive(Clone, Default, Routable)]
pub struct Users {
    #[router(skip)]
    store: Arc<RwLock<BTreeMap<u64, User>>>,
}

#[routes]
impl Users {
    fn GetUsers(&self, c: &mut Context) {
        let Ok(store) = self.store.read() else {
            return c.string(StatusCode::INTERNAL_SERVER_ERROR, "user store unavailable");
        };
        let users: Vec<&User> = store.values().collect();
        c.json(StatusCode::OK, &users);
    }

    fn GetUser_1id(&self, c: &mut Context) {
        let Some(id) = c.param("id").and_then(|id| id.parse::<u64>().ok()) else {
            return c.json(StatusCode::BAD_REQUEST, &json!({ "error": "id must be a number" }));
        };
        let Ok(store) = self.store.read() else {
            return c.string(StatusCode::INTERNAL_SERVER_ERROR, "user store unavailable");
        };

        match store.get(&id) {
            Some(user) => c.json(StatusCode::OK, user),
            None => c.json(StatusCode::NOT_FOUND, &json!({ "error": "no such user" })),
        }
    }

    fn PostUser(&self, c: &mut Context) {
        let new_user = match c.bind_json::<NewUser>() {
            Ok(new_user) => new_user,
            Err(err) => {
                return c.json(StatusCode::BAD_REQUEST, &json!({ "error": err.to_string() }));
            }
        };
        let Ok(mut store) = self.store.write() else {
            return c.string(StatusCode::INTERNAL_SERVER_ERROR, "user store unavailable");
        };

        let id = store.keys().next_back().map_or(1, |last| last + 1);
        let user = User {
            id,
            name: new_user.name,
        };
        tracing::info!(id, name = %user.name, "user created");
        store.insert(id, user.clone());
        c.json(StatusCode::CREATED, &user);
    }
}
