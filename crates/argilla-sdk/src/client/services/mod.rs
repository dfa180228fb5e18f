//! API service implementations.

mod annotations;
mod datasets;
mod records;
mod schema;
mod users;
mod workspaces;

pub use annotations::{ResponsesService, SuggestionsService};
pub use datasets::DatasetsService;
pub use records::{LogOptions, RecordPager, RecordsService};
pub use schema::{FieldsService, MetadataPropertiesService, QuestionsService, VectorsSettingsService};
pub use users::UsersService;
pub use workspaces::WorkspacesService;
