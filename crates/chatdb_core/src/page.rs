use std::collections::BTreeSet;

/// The page elements the handlers read from or render into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ElementId {
    SendButton,
    UserInput,
    ChatBox,
    QueryList,
    FileInput,
    Results,
}

impl ElementId {
    pub const ALL: [ElementId; 6] = [
        ElementId::SendButton,
        ElementId::UserInput,
        ElementId::ChatBox,
        ElementId::QueryList,
        ElementId::FileInput,
        ElementId::Results,
    ];

    /// The element's identifier on the page.
    pub fn dom_id(self) -> &'static str {
        match self {
            ElementId::SendButton => "send-button",
            ElementId::UserInput => "user-input",
            ElementId::ChatBox => "chat-box",
            ElementId::QueryList => "query-list",
            ElementId::FileInput => "fileInput",
            ElementId::Results => "results",
        }
    }

    pub fn from_dom_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|element| element.dom_id() == id)
    }
}

/// Which elements are present on the page.
///
/// Built once at startup and owned by `AppState`; handlers consult it
/// instead of looking elements up globally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLayout {
    mounted: BTreeSet<ElementId>,
}

impl Default for PageLayout {
    fn default() -> Self {
        Self::full()
    }
}

impl PageLayout {
    /// Layout with every element mounted.
    pub fn full() -> Self {
        Self {
            mounted: ElementId::ALL.into_iter().collect(),
        }
    }

    pub fn without(mut self, element: ElementId) -> Self {
        self.mounted.remove(&element);
        self
    }

    pub fn is_mounted(&self, element: ElementId) -> bool {
        self.mounted.contains(&element)
    }

    pub fn mounted(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.mounted.iter().copied()
    }
}
