// File: src/binder.rs
// Purpose: Recursive walk that binds a routable value onto a route group

use conroute_naming::{parse_name, USE_METHOD};

use crate::error::BindError;
use crate::facade::{Registrar, RouteGroup};
use crate::routable::{FieldEntry, MethodEntry, MethodKind, Routable};

/// Field tag that excludes a field and everything below it
pub const SKIP_TAG: &str = "-";

/// Bind `value`'s routes onto `group`
///
/// For each level, in order:
/// 1. the level's own `Use` method installs middleware (or, taking a group,
///    registers routes by hand)
/// 2. every other declared method matching the action vocabulary is
///    registered
/// 3. every field is bound recursively, under a sub-group from its tag or
///    name, or under the same group when embedded or named after its type
///
/// The first failure aborts the walk. Routes registered before it are kept.
pub fn bind(group: &mut dyn RouteGroup, value: &dyn Routable) -> Result<(), BindError> {
    let mut methods: Vec<MethodEntry> = value
        .methods()
        .into_iter()
        .filter(|entry| !entry.promoted)
        .collect();

    if let Some(index) = methods.iter().position(|entry| entry.name == USE_METHOD) {
        install_use(group, methods.remove(index));
    }

    let mut registrar = Registrar::new(group);
    for entry in methods {
        if entry.name == USE_METHOD {
            continue;
        }
        registrar.bind(entry)?;
    }

    for field in value.fields() {
        bind_field(group, field)?;
    }

    Ok(())
}

fn install_use(group: &mut dyn RouteGroup, entry: MethodEntry) {
    match entry.kind {
        MethodKind::Handler(handler) => {
            tracing::debug!(base = group.base_path(), "installing middleware");
            group.use_handlers(vec![handler]);
        }
        MethodKind::Chain(chain) => {
            let handlers = chain();
            tracing::debug!(base = group.base_path(), count = handlers.len(), "installing middleware chain");
            group.use_handlers(handlers);
        }
        MethodKind::Hook(hook) => {
            tracing::debug!(base = group.base_path(), "calling group hook");
            hook(group);
        }
        kind => {
            tracing::trace!(?kind, "ignoring Use with unsupported signature");
        }
    }
}

fn bind_field(group: &mut dyn RouteGroup, field: FieldEntry<'_>) -> Result<(), BindError> {
    match field.tag {
        Some(SKIP_TAG) => {
            tracing::trace!(field = field.name, "skipping excluded field");
            Ok(())
        }
        Some(path) => bind(group.group(path).as_mut(), field.value),
        // A field named after its own type is anonymous, like an embedded one
        None if !field.embedded && field.name != field.type_name => {
            let path = parse_name(field.name);
            bind(group.group(&path).as_mut(), field.value)
        }
        None => bind(group, field.value),
    }
}
