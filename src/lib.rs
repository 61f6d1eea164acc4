//! Vibescape is the per-frame engine of a vector scene editor.
//!
//! Every frame it turns a scene graph of nested objects and their "vibe"
//! stacks (procedural effects such as pulse, float, shake, glow, spin and
//! flicker) into a concrete visual state per object. Rendering, persistence
//! and asset management live outside the crate.
//!
//! # Pipeline overview
//!
//! 1. **Animate**: keyframe tracks override object locals (`AnimationTrack`)
//! 2. **Resolve**: parent chains compose into a global transform (`TransformResolver`),
//!    and anchors replace the global position (`AnchorPositioner`)
//! 3. **Vibe**: the component's vibe stack, or its active state's stack, folds into a
//!    `VibeState` (`VibeStackComposer`), optionally driven by live audio levels
//! 4. **Emit**: hue placement (`ColorModulator`), mask binding (`MaskBinder`) and
//!    opacity complete each `EvaluatedObject`
//!
//! Interaction runs beside the frame loop: `InteractionHost` routes clicks, hovers,
//! timers and proximity through each instance's `StateMachineRuntime`, and writes
//! the resulting active states into the pending graph of a `SceneStore`.
//!
//! Design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Snapshot evaluation**: frames read an immutable `SceneGraph`; edits land in the
//!   next snapshot.
//! - **Deterministic when seeded**: shake and flicker draw from per-object seeded
//!   generators.
#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod animation;
mod audio;
mod eval;
mod foundation;
mod interaction;
mod scene;
mod vibe;

pub use animation::ease::Ease;
pub use animation::keyframes::{
    AnimationTrack, KeyValue, Keyframe, Lerp, PropertyTrack, Rgb8, TimeBasis,
};
pub use audio::device::{AudioDevice, AudioSession, PcmSession, PcmSource};
pub use audio::levels::{AudioBand, AudioLevels, BandLevels};
pub use audio::sampler::{AudioConfig, AudioReactiveSampler, BandAnalyser, band_energy};
pub use eval::config::EngineConfig;
pub use eval::evaluator::{EvaluatedFrame, EvaluatedObject, FrameEvaluator};
pub use eval::ticker::{FrameTick, Ticker};
pub use foundation::core::{Affine, Canvas, Fps, FrameIndex, Point, Vec2};
pub use foundation::error::{VibeError, VibeResult};
pub use foundation::math::{RandomSource, Rng64, stable_hash64};
pub use interaction::condition::Condition;
pub use interaction::events::{
    ComponentEvent, EventAction, EventTrigger, InteractionHost, InteractionInput, Outcome,
    TimerSchedule,
};
pub use interaction::machine::{State, StateAction, StateMachine, Transition};
pub use interaction::runtime::StateMachineRuntime;
pub use scene::anchor::{AnchorConfig, AnchorPositioner, HorizontalAnchor, VerticalAnchor};
pub use scene::graph::{SceneGraph, SceneStore};
pub use scene::mask::{BoundMask, MaskBinder};
pub use scene::model::{
    Asset, AssetNode, ChildRef, Component, Drawable, FilterSpec, Group, MaskKind, MaskRef,
    ObjectTarget, Primitive, SceneLayer, SceneObject, promote_vibe,
};
pub use scene::transform::{GlobalTransform, Transform, TransformResolver};
pub use vibe::color::{ColorModulation, ColorModulator};
pub use vibe::evaluator::{VibeDelta, VibeEvaluator, VibeState, spin_degrees};
pub use vibe::model::{AudioReactiveConfig, HueTarget, VibeConfig, VibeKind};
pub use vibe::stack::{VibeStackComposer, audio_level_for, stack_spin_degrees};
