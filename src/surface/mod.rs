/// Surface data model
///
/// A surface is a single on-screen interactive element (picker or input
/// box) bound to one wizard step. The framework describes a surface with
/// the plain parameter structs below; a `SurfaceHost` turns them into
/// something visible and streams the user's interactions back as events.
use std::sync::Arc;

/// Predicate consulted when a surface hides without explicit acceptance.
/// `true` means re-run the same step (Resume), `false` means Cancel.
pub type ResumePredicate = Arc<dyn Fn() -> bool + Send + Sync>;

/// Validation function for input boxes. Returns an error message to show,
/// or `None` when the value is acceptable.
pub type Validator = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// One selectable entry in a picker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickEntry {
    /// Stable key the calling code uses to recognize the entry
    pub key: String,
    /// Primary display text
    pub label: String,
    /// Secondary display text
    pub description: Option<String>,
    /// Longer display text shown under the label
    pub detail: Option<String>,
}

impl PickEntry {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            description: None,
            detail: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

/// Parameters for a picker surface
#[derive(Clone)]
pub struct PickParams {
    pub title: String,
    /// 1-indexed position of this step
    pub step: usize,
    pub total_steps: usize,
    pub placeholder: Option<String>,
    /// Keep the surface open when it loses focus
    pub ignore_focus_out: bool,
    pub items: Vec<PickEntry>,
    pub multi_select: bool,
    /// Indices into `items` selected when the surface opens
    pub preselected: Vec<usize>,
    /// Named action buttons beyond Back
    pub actions: Vec<String>,
    /// `None` means never resume (hide always cancels)
    pub should_resume: Option<ResumePredicate>,
}

impl PickParams {
    pub fn new(
        title: impl Into<String>,
        step: usize,
        total_steps: usize,
        items: Vec<PickEntry>,
    ) -> Self {
        Self {
            title: title.into(),
            step,
            total_steps,
            placeholder: None,
            ignore_focus_out: true,
            items,
            multi_select: false,
            preselected: Vec::new(),
            actions: Vec::new(),
            should_resume: None,
        }
    }
}

/// Parameters for a text-input surface
#[derive(Clone)]
pub struct InputParams {
    pub title: String,
    /// 1-indexed position of this step
    pub step: usize,
    pub total_steps: usize,
    /// Initial value shown in the box
    pub value: String,
    pub placeholder: Option<String>,
    /// Prompt text shown under the box
    pub prompt: Option<String>,
    /// Keep the surface open when it loses focus
    pub ignore_focus_out: bool,
    /// Named action buttons beyond Back
    pub actions: Vec<String>,
    pub validate: Validator,
    /// `None` means never resume (hide always cancels)
    pub should_resume: Option<ResumePredicate>,
}

impl InputParams {
    pub fn new(title: impl Into<String>, step: usize, total_steps: usize) -> Self {
        Self {
            title: title.into(),
            step,
            total_steps,
            value: String::new(),
            placeholder: None,
            prompt: None,
            ignore_focus_out: true,
            actions: Vec::new(),
            validate: Arc::new(|_| None),
            should_resume: None,
        }
    }

    pub fn with_validator(mut self, validate: Validator) -> Self {
        self.validate = validate;
        self
    }
}

/// Events a picker surface emits
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickEvent {
    /// Selection changed to the given item indices
    SelectionChanged(Vec<usize>),
    /// Explicit confirmation of the current selection (multi-select)
    Confirmed,
    /// A named action button was triggered
    Action(String),
    /// The Back button was triggered
    Back,
    /// Hidden without a selection
    Hidden,
}

/// Events a text-input surface emits
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    ValueChanged(String),
    Accepted,
    /// A named action button was triggered
    Action(String),
    /// The Back button was triggered
    Back,
    /// Hidden without acceptance
    Hidden,
}

/// What a picker interaction produced on normal acceptance
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickResponse {
    /// The selected item(s)
    Picked(Vec<PickEntry>),
    /// A named action button fired instead of a selection
    Action(String),
}

/// What an input-box interaction produced on normal acceptance
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputResponse {
    /// The validated final value
    Value(String),
    /// A named action button fired instead of acceptance
    Action(String),
}
