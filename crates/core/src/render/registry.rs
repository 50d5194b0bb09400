use std::collections::HashMap;
use std::fmt::{self, Debug};

use super::{AnyView, CourseInfoView, ResultView, ResultViewObject};

/// Result views keyed by tool name.
///
/// Supporting a new tool only takes registering its view here; tools
/// without a view fall back to a JSON dump.
#[derive(Default)]
pub struct Registry {
    views: HashMap<String, Box<dyn ResultViewObject>>,
}

impl Registry {
    /// Creates a registry with the built-in views.
    #[inline]
    pub fn standard() -> Self {
        Self::default().with_view(CourseInfoView)
    }

    /// Registers a view, replacing any view registered for the same tool.
    pub fn register<V: ResultView>(&mut self, view: V) {
        let name = view.tool_name().to_owned();
        if self.views.insert(name, Box::new(AnyView(view))).is_some() {
            debug!("replaced result view");
        }
    }

    /// Registers a view.
    #[inline]
    pub fn with_view<V: ResultView>(mut self, view: V) -> Self {
        self.register(view);
        self
    }

    /// Returns `true` if a view is registered for `tool_name`.
    #[inline]
    pub fn contains(&self, tool_name: &str) -> bool {
        self.views.contains_key(tool_name)
    }

    #[inline]
    pub(crate) fn get(&self, tool_name: &str) -> Option<&dyn ResultViewObject> {
        self.views.get(tool_name).map(|view| view.as_ref())
    }
}

impl Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.views.keys().collect();
        names.sort();
        f.debug_struct("Registry").field("views", &names).finish()
    }
}
