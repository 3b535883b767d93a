//! PageGrid Core Library
//!
//! Platform-agnostic core of the PageGrid page builder: the responsive grid
//! coordinate engine, the state store, undo/redo, and the drag and resize
//! engines.

pub mod builder;
pub mod config;
pub mod drag;
pub mod error;
pub mod grid;
pub mod history;
pub mod layout;
pub mod model;
pub mod notify;
pub mod registry;
pub mod resize;
pub mod snap;
pub mod storage;
pub mod store;
pub mod visual;

pub use builder::{DeleteRequest, Direction, PageBuilder, PaletteDrop, SelectRequest};
pub use config::GridConfig;
pub use drag::{CrossCanvasMove, DragController, DragOutcome, GestureCommit};
pub use error::{BuilderError, BuilderResult};
pub use grid::{ContainerMetrics, GridCalculator, StaticContainers};
pub use history::{Command, History, MoveCommand};
pub use model::{Canvas, CanvasId, GridItem, GridPoint, GridRect, ItemId, Layouts, MobileLayout, Viewport};
pub use registry::{ComponentRegistry, ComponentTemplate};
pub use resize::{Corner, DeltaRect, Edge, ResizeController, ResizeHandle, ResizeOutcome};
pub use store::{PageDocument, Selection, StateStore, StoreEvent, SubscriptionId};
pub use visual::{FrameHandle, FrameScheduler, PointerTarget, VisualTarget};
