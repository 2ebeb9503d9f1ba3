//! The set of tools exposed to the language model.

use std::{collections::HashMap, sync::Arc};

use tracing::debug;

use medlens_contracts::tool::ToolDescriptor;

use crate::traits::ToolHandler;

/// Tools keyed by name, listed in registration order.
///
/// Built once at agent construction and handed to the dispatcher.
#[derive(Default, Clone)]
pub struct ToolRegistry {
    handlers: Vec<Arc<dyn ToolHandler>>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tool. A tool with the same name replaces the earlier one in place.
    pub fn register(&mut self, handler: Arc<dyn ToolHandler>) {
        let name = handler.descriptor().name.clone();
        match self.index.get(&name) {
            Some(&slot) => {
                debug!(tool = %name, "replacing registered tool");
                self.handlers[slot] = handler;
            }
            None => {
                debug!(tool = %name, "registering tool");
                self.index.insert(name, self.handlers.len());
                self.handlers.push(handler);
            }
        }
    }

    /// Builder-style [`register`](Self::register).
    pub fn with(mut self, handler: Arc<dyn ToolHandler>) -> Self {
        self.register(handler);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn ToolHandler>> {
        self.index.get(name).map(|&slot| &self.handlers[slot])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Descriptors in registration order.
    pub fn descriptors(&self) -> Vec<ToolDescriptor> {
        self.handlers.iter().map(|h| h.descriptor().clone()).collect()
    }

    /// Tool names in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.handlers
            .iter()
            .map(|h| h.descriptor().name.as_str())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.names())
            .finish()
    }
}
