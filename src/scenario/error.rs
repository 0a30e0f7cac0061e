use std::fmt;

#[derive(Debug)]
pub enum ScenarioError {
    /// Reading a scenario or fields file failed
    Io { path: String, source: std::io::Error },

    /// A scenario or fields file is not valid YAML for its type
    Yaml { path: String, source: serde_yaml::Error },

    /// No editing surface has this name
    UnknownSurface(String),

    /// A `change_category` step names a tab the surface does not have
    UnknownCategory { step: usize, category: String },

    /// A `choose` step ran with no confirmation prompt pending
    NoPendingPrompt { step: usize },

    /// A step needs the form to be open
    NotOpen { step: usize, action: String },
}

impl fmt::Display for ScenarioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScenarioError::Io { path, source } => {
                write!(f, "Failed to read '{}': {}", path, source)
            }
            ScenarioError::Yaml { path, source } => {
                write!(f, "Invalid YAML in '{}': {}", path, source)
            }
            ScenarioError::UnknownSurface(name) => {
                write!(f, "Unknown surface '{}' (expected patient, user, antecedent or medical_record)", name)
            }
            ScenarioError::UnknownCategory { step, category } => {
                write!(f, "Step {} switches to unknown category '{}'", step, category)
            }
            ScenarioError::NoPendingPrompt { step } => {
                write!(f, "Step {} chose a prompt answer but no prompt is pending", step)
            }
            ScenarioError::NotOpen { step, action } => {
                write!(f, "Step {} ({}) requires an open form", step, action)
            }
        }
    }
}

impl std::error::Error for ScenarioError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ScenarioError::Io { source, .. } => Some(source),
            ScenarioError::Yaml { source, .. } => Some(source),
            _ => None,
        }
    }
}
