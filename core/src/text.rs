use std::collections::HashMap;

/// Keys of the user-facing texts the controller produces.
pub mod keys {
    pub const OBJECT_CREATED: &str = "OBJECT_CREATED";
    pub const OBJECT_SAVED: &str = "OBJECT_SAVED";
    pub const OBJECT_DELETED: &str = "OBJECT_DELETED";
    pub const OBJECTS_DELETED: &str = "OBJECTS_DELETED";
    pub const DISCARD_CONFIRM: &str = "DISCARD_CONFIRM";
    pub const DELETE_SINGLE: &str = "DELETE_SINGLE";
    pub const DELETE_SINGLE_WITH_TITLE: &str = "DELETE_SINGLE_WITH_TITLE";
    pub const DELETE_MULTIPLE: &str = "DELETE_MULTIPLE";
    pub const DELETE_SOME_NOT_DELETABLE: &str = "DELETE_SOME_NOT_DELETABLE";
    pub const DELETE_NONE_DELETABLE: &str = "DELETE_NONE_DELETABLE";
    pub const DELETE_FAILED: &str = "DELETE_FAILED";
    pub const LOCKED_BY: &str = "LOCKED_BY";
    pub const UNSAVED_CHANGES: &str = "UNSAVED_CHANGES";
    pub const CRITICAL_ACTION: &str = "CRITICAL_ACTION";
}

const DEFAULTS: &[(&str, &str)] = &[
    (keys::OBJECT_CREATED, "Object created."),
    (keys::OBJECT_SAVED, "Your changes have been saved."),
    (keys::OBJECT_DELETED, "Object deleted."),
    (keys::OBJECTS_DELETED, "{0} objects deleted."),
    (keys::DISCARD_CONFIRM, "Discard all changes?"),
    (keys::DELETE_SINGLE, "Delete this object?"),
    (keys::DELETE_SINGLE_WITH_TITLE, "Delete object {0}?"),
    (keys::DELETE_MULTIPLE, "Delete the {0} selected objects?"),
    (keys::DELETE_SOME_NOT_DELETABLE, "{0} of {1} selected objects cannot be deleted."),
    (keys::DELETE_NONE_DELETABLE, "None of the selected objects can be deleted."),
    (keys::DELETE_FAILED, "{0} could not be deleted."),
    (keys::LOCKED_BY, "This object is currently locked by {0}."),
    (keys::UNSAVED_CHANGES, "{0} has unsaved changes in this object. If you continue editing, these changes will be lost."),
    (keys::CRITICAL_ACTION, "Do you really want to execute the action {0}?"),
];

/// Localized user-facing texts with `{0}`-style placeholders.
#[derive(Debug, Clone)]
pub struct TextBundle {
    texts: HashMap<String, String>,
}

impl Default for TextBundle {
    fn default() -> Self { Self { texts: DEFAULTS.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect() } }
}

impl TextBundle {
    pub fn with_overrides(overrides: &HashMap<String, String>) -> Self {
        let mut bundle = Self::default();
        bundle.texts.extend(overrides.iter().map(|(k, v)| (k.clone(), v.clone())));
        bundle
    }

    /// Unknown keys render as the key itself.
    pub fn get(&self, key: &str, args: &[&str]) -> String {
        let mut text = self.texts.get(key).cloned().unwrap_or_else(|| key.to_string());
        for (i, arg) in args.iter().enumerate() {
            text = text.replace(&format!("{{{i}}}"), arg);
        }
        text
    }
}
