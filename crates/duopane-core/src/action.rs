//! Catalogue of the filesystem operations a user can trigger.
//!
//! [`OperationKind`] names an operation without its arguments;
//! [`OperationKind::descriptor`] supplies the metadata a menu or toolbar
//! needs (label, description, whether a selection is required).

/// Every filesystem-mutating operation the core can perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Move,
    Copy,
    Rename,
    Delete,
    CreateFile,
    CreateDirectory,
    ChangePermissions,
    Archive,
}

/// Static metadata about an [`OperationKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperationDescriptor {
    pub kind: OperationKind,
    pub name: &'static str,
    pub description: &'static str,
    /// Whether the operation acts on the active selection.
    pub requires_selection: bool,
}

const DESCRIPTORS: &[OperationDescriptor] = &[
    OperationDescriptor {
        kind: OperationKind::Move,
        name: "Move",
        description: "Move the selected entry to the other pane",
        requires_selection: true,
    },
    OperationDescriptor {
        kind: OperationKind::Copy,
        name: "Copy",
        description: "Copy the selected file to the other pane",
        requires_selection: true,
    },
    OperationDescriptor {
        kind: OperationKind::Rename,
        name: "Rename",
        description: "Rename the selected entry",
        requires_selection: true,
    },
    OperationDescriptor {
        kind: OperationKind::Delete,
        name: "Delete",
        description: "Delete the selected entry",
        requires_selection: true,
    },
    OperationDescriptor {
        kind: OperationKind::CreateFile,
        name: "New File",
        description: "Create an empty file",
        requires_selection: false,
    },
    OperationDescriptor {
        kind: OperationKind::CreateDirectory,
        name: "New Folder",
        description: "Create an empty folder",
        requires_selection: false,
    },
    OperationDescriptor {
        kind: OperationKind::ChangePermissions,
        name: "Permissions",
        description: "Change file and folder permissions",
        requires_selection: true,
    },
    OperationDescriptor {
        kind: OperationKind::Archive,
        name: "Zip",
        description: "Create a zip archive next to the selected entry",
        requires_selection: true,
    },
];

impl OperationKind {
    /// All operations in menu order.
    pub fn all() -> impl Iterator<Item = OperationKind> {
        DESCRIPTORS.iter().map(|d| d.kind)
    }

    pub fn descriptor(self) -> &'static OperationDescriptor {
        let index = match self {
            OperationKind::Move => 0,
            OperationKind::Copy => 1,
            OperationKind::Rename => 2,
            OperationKind::Delete => 3,
            OperationKind::CreateFile => 4,
            OperationKind::CreateDirectory => 5,
            OperationKind::ChangePermissions => 6,
            OperationKind::Archive => 7,
        };
        &DESCRIPTORS[index]
    }

    pub fn name(self) -> &'static str {
        self.descriptor().name
    }

    pub fn requires_selection(self) -> bool {
        self.descriptor().requires_selection
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_kind_has_its_own_descriptor() {
        let kinds: Vec<_> = OperationKind::all().collect();
        assert_eq!(kinds.len(), 8);
        for kind in kinds {
            assert_eq!(kind.descriptor().kind, kind);
        }
        assert_eq!(OperationKind::Archive.descriptor().name, "Zip");
        assert_eq!(OperationKind::Copy.descriptor().name, "Copy");
    }

    #[test]
    fn only_create_operations_work_without_selection() {
        let free: Vec<_> = OperationKind::all()
            .filter(|k| !k.requires_selection())
            .collect();
        assert_eq!(
            free,
            vec![OperationKind::CreateFile, OperationKind::CreateDirectory]
        );
    }

    #[test]
    fn names_are_menu_labels() {
        assert_eq!(OperationKind::ChangePermissions.name(), "Permissions");
        assert_eq!(OperationKind::Archive.name(), "Zip");
    }
}
