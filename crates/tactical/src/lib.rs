//! Tactical map display and input dispatch.
//!
//! A [`Display`] holds the cell map, per-house shroud, object layers, the
//! camera and the interaction state for one game session. Game code feeds it
//! objects and mouse input; it paints the visible map into a [`Surface`] and
//! reports the player's orders as [`OutgoingEvent`]s.

pub mod app;
pub mod config;
pub mod coord;
pub mod display;
pub mod events;
pub mod house;
pub mod interaction;
pub mod layer;
pub mod map;
pub mod object;
pub mod redraw;
pub mod rendering;
pub mod scenario;
pub mod shroud;
pub mod viewport;

#[cfg(test)]
mod testkit;

pub use app::{
    run_app, run_app_with_metrics, AppError, KeyCode, LoopMetricsSnapshot, MetricsHandle,
    TacticalGame, SLOW_FRAME_ENV_VAR,
};
pub use config::{ConfigError, DisplayConfig, CONFIG_ENV_VAR};
pub use coord::{Cell, Coordinate, Facing, Footprint};
pub use display::{Display, DisplayOptions, ScreenRect};
pub use events::{OutgoingEvent, Speech};
pub use house::{House, HouseId, HouseSet, Houses, Session, SessionKind};
pub use interaction::{InteractionMode, KeyFlags, ModeControl, MouseShape, RubberBand};
pub use layer::LayerKind;
pub use map::{CellFlags, CellState, MapBounds, TacticalMap, Theater};
pub use object::{
    Action, ClickContext, FormationMove, ObjectId, ObjectPool, ObjectType, Rtti, SpecialWeapon,
    TacticalObject, Target, TargetInfo, TypeKey, TypeRef,
};
pub use rendering::{FrameStats, Surface, SurfaceError};
pub use scenario::{IniError, IniStore, ScenarioError, Waypoints};
pub use shroud::ShadowIcon;
