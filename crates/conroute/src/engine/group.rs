// File: src/engine/group.rs
// Purpose: axum-backed route group

use conroute_naming::Verb;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use super::path::join_paths;
use super::table::{RouteTable, StaticTarget};
use crate::error::RegisterError;
use crate::facade::{RouteGroup, StaticRoute};
use crate::handler::{combine, HandlerFunc, HandlersChain};

/// A path prefix and middleware chain over an engine's route table
///
/// Child groups copy the parent's chain at creation time, so middleware
/// added to a parent afterwards does not reach them.
#[derive(Clone)]
pub struct RouterGroup {
    base_path: String,
    handlers: HandlersChain,
    table: Rc<RefCell<RouteTable>>,
}

impl fmt::Debug for RouterGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouterGroup")
            .field("base_path", &self.base_path)
            .field("handlers", &self.handlers.len())
            .finish()
    }
}

impl RouterGroup {
    pub(crate) fn root(table: Rc<RefCell<RouteTable>>) -> Self {
        Self {
            base_path: "/".to_string(),
            handlers: Vec::new(),
            table,
        }
    }

    /// Child group at `relative`
    pub fn child(&self, relative: &str) -> RouterGroup {
        RouterGroup {
            base_path: join_paths(&self.base_path, relative),
            handlers: self.handlers.clone(),
            table: Rc::clone(&self.table),
        }
    }

    /// Number of middleware handlers applied to routes of this group
    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    fn add_static(&self, mount: &str, target: StaticTarget) -> Result<(), RegisterError> {
        let path = join_paths(&self.base_path, mount);
        self.table
            .borrow_mut()
            .add_static(path, target, self.handlers.clone())
    }
}

impl RouteGroup for RouterGroup {
    fn base_path(&self) -> &str {
        &self.base_path
    }

    fn group(&self, relative: &str) -> Box<dyn RouteGroup> {
        Box::new(self.child(relative))
    }

    fn use_handlers(&mut self, handlers: HandlersChain) {
        self.handlers.extend(handlers);
    }

    fn handle(&mut self, verb: Verb, relative: &str, handler: HandlerFunc) -> Result<(), RegisterError> {
        let path = join_paths(&self.base_path, relative);
        let chain = combine(&self.handlers, handler);
        self.table.borrow_mut().add_route(verb, path, chain)
    }

    fn register_static(&mut self, route: StaticRoute) -> Result<(), RegisterError> {
        match route {
            StaticRoute::File { mount, file } => self.add_static(&mount, StaticTarget::File(file)),
            StaticRoute::FileFs { mount, file, fs } => {
                let file = fs.root.join(file.trim_start_matches('/'));
                self.add_static(&mount, StaticTarget::File(file))
            }
            StaticRoute::Dir { mount, root } => self.add_static(&mount, StaticTarget::Dir { root, index: false }),
            StaticRoute::Fs { mount, fs } => self.add_static(
                &mount,
                StaticTarget::Dir {
                    root: fs.root,
                    index: fs.index,
                },
            ),
        }
    }
}
