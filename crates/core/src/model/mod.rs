mod completion;
mod course;
mod ids;
pub mod options;
mod resume;
mod viewer;

pub use completion::{
    CompletionStatus, CompletionSummary, CourseCompletionRecord, SectionCompletion,
};
pub use course::{
    Activity, CompletionState, CompletionTracking, Course, CourseFormat, Section,
};
pub use ids::{CourseId, ModuleId, ParseIdError, SectionId, UserId};
pub use options::{
    CourseOptions, DisplayOptions, HiddenSections, ImageFormat, RichText, SectionOptions,
    SummaryIcon, SummaryItemOption,
};
pub use resume::{PageLevel, ResumePoint};
pub use viewer::{Capabilities, Viewer};
