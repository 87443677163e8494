/// Boxed error used at extension seams (guards, component loaders, slices).
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("state slice '{0}' is already registered")]
    DuplicateSlice(String),
    #[error("state slice '{0}' is not registered")]
    UnknownSlice(String),
    #[error("slice '{slice}' has no mutation '{mutation}'")]
    UnknownMutation { slice: String, mutation: String },
    #[error("slice '{slice}' has no accessor '{accessor}'")]
    UnknownAccessor { slice: String, accessor: String },
    #[error("invalid payload for '{slice}/{entry}': {reason}")]
    Payload {
        slice: String,
        entry: String,
        reason: String,
    },
    #[error("mutation '{slice}/{mutation}' failed: {reason}")]
    MutationFailed {
        slice: String,
        mutation: String,
        reason: String,
    },
    #[error("slice '{slice}' does not hold state of type {expected}")]
    TypeMismatch {
        slice: String,
        expected: &'static str,
    },
    #[error("invalid store path '{0}', expected 'slice/entry'")]
    InvalidPath(String),
}

#[derive(Debug, thiserror::Error)]
pub enum NavigationError {
    #[error("navigation guard failed on the way to '{to}': {reason}")]
    GuardFailed { to: String, reason: String },
    #[error("navigation to '{to}' aborted by guard")]
    Aborted { to: String },
    #[error("navigation to '{to}' superseded by a newer navigation")]
    Superseded { to: String },
    #[error("already at '{to}'")]
    Duplicated { to: String },
    #[error("too many redirects starting at '{from}'")]
    RedirectLoop { from: String },
    #[error("failed to load component '{component}': {reason}")]
    ComponentLoad { component: String, reason: String },
    #[error("no route named '{0}'")]
    UnknownRouteName(String),
    #[error("missing param '{param}' for route '{route}'")]
    MissingParam { route: String, param: String },
    #[error("navigation engine has not been started")]
    NotStarted,
    #[error("navigation engine already started")]
    AlreadyStarted,
    #[error("a global navigation guard is already installed")]
    GuardAlreadyInstalled,
    #[error("no history entry to go back to")]
    NoHistory,
}

impl NavigationError {
    /// Failures that leave the current route untouched and are safe to ignore.
    pub fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            NavigationError::AlreadyStarted | NavigationError::GuardAlreadyInstalled
        )
    }
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;
pub type NavigationResult<T> = std::result::Result<T, NavigationError>;
