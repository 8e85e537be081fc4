use std::fmt;

use crate::ecs::component::Id;

/// Failure to resolve or register a component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The component is not in the static list and was never registered.
    Unregistered { name: Option<&'static str> },

    /// The component was already registered with this id.
    AlreadyRegistered { name: Option<&'static str>, id: Id },

    /// The component is in the static list at this position and needs no registration.
    Static { name: Option<&'static str>, id: Id },
}

impl Error {
    /// The diagnostic name of the component involved, if it has one.
    pub fn name(&self) -> Option<&'static str> {
        match self {
            Self::Unregistered { name }
            | Self::AlreadyRegistered { name, .. }
            | Self::Static { name, .. } => *name,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.name().unwrap_or("unknown");
        match self {
            Self::Unregistered { .. } => write!(f, "Component \"{name}\" was not registered"),
            Self::AlreadyRegistered { id, .. } => write!(
                f,
                "Component \"{name}\" is already registered with id {}",
                id.index()
            ),
            Self::Static { id, .. } => write!(
                f,
                "Component \"{name}\" has static id {} and cannot be registered",
                id.index()
            ),
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_component_or_unknown() {
        assert_eq!(
            Error::Unregistered { name: Some("Position") }.to_string(),
            "Component \"Position\" was not registered"
        );
        assert_eq!(
            Error::Unregistered { name: None }.to_string(),
            "Component \"unknown\" was not registered"
        );
        assert_eq!(
            Error::AlreadyRegistered { name: Some("Tag"), id: Id::new(4) }.to_string(),
            "Component \"Tag\" is already registered with id 4"
        );
        assert_eq!(
            Error::Static { name: None, id: Id::new(0) }.to_string(),
            "Component \"unknown\" has static id 0 and cannot be registered"
        );
    }
}
