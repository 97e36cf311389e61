pub mod catalog;
pub mod clock;
pub mod decimation;
pub mod history;
pub mod sampler;
pub mod scale;
pub mod source;
pub mod storage;
pub mod types;
pub mod windowing;

pub use catalog::{SensorSources, SeriesCatalog, SeriesDeclaration, SeriesDescriptor};
pub use clock::{Clock, ManualClock, SystemClock};
pub use decimation::{reduce, reduce_and_smooth, smooth};
pub use history::{HistoryLimits, HistoryStore};
pub use sampler::{SampleOutcome, Sampler};
pub use scale::LinearScale;
pub use source::{FnSource, NumericSource, StateTable, from_fn};
pub use storage::{KeyValueStore, MemoryKeyValueStore, fnv1a_32, storage_identity, storage_key};
pub use types::{Sample, Surface, Viewport};
pub use windowing::{TimeWindow, resolve_visible_window, samples_in_window};
