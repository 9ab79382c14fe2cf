#![forbid(unsafe_code)]

pub mod composer;
pub mod course_events;
pub mod error;
pub mod format_options_service;
pub mod format_services;
pub mod host;
pub mod image;
pub mod resume_service;

pub use composer::{
    ComposerDeps, OverviewContext, PageComposer, PageContext, PageRequest, SectionContext,
    TopicsComposer, TwoColumnComposer, composer_for,
};
pub use course_events::{CourseEvent, CourseEventHandler};
pub use error::{ComposeError, FormatOptionsError, HostError, ResumeError};
pub use format_options_service::FormatOptionsService;
pub use format_services::FormatServices;
pub use host::{CompletionProvider, CourseImageProvider, InMemoryHost};
pub use image::{HeaderImage, HeaderImageResolver, HeaderImageSource, ImageSource};
pub use resume_service::ResumeService;
