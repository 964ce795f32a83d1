//! Simulation state and its transition function

use bounce2d_math::Vec2;

use crate::dynamics::{create_dynamics, Dynamics, DynamicsKind, DynamicsSettings};
use crate::entity::Entity;
use crate::hit::pick;
use crate::record::{EntityRecord, LoadReport};
use crate::render::{draw_label, Renderer};
use crate::viewport::Viewport;

/// The entity currently under the pointer
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hold {
    /// Index into the entity list
    pub index: usize,
    /// Pointer position minus entity center at grab time
    pub offset: Vec2,
}

/// Everything that can happen to a simulation
#[derive(Clone, Debug, PartialEq)]
pub enum InputEvent {
    /// A file finished loading; replaces every entity
    Loaded(LoadReport),
    PointerDown(Vec2),
    PointerMove(Vec2),
    PointerUp,
    /// The pointer left the drawing surface
    PointerLeave,
    Resize(Viewport),
    /// One frame passed, `dt` seconds since the last
    Tick(f32),
}

/// The loaded entities, the pointer hold and the active strategy
///
/// All mutation goes through [`handle`](Self::handle) or the matching
/// methods. The entity list is only ever replaced as a whole.
pub struct SimulationState {
    entities: Vec<Entity>,
    hold: Option<Hold>,
    viewport: Viewport,
    dynamics: Box<dyn Dynamics>,
    settings: DynamicsSettings,
}

impl SimulationState {
    /// Create an empty simulation using the strategy `kind`
    pub fn new(viewport: Viewport, kind: DynamicsKind, settings: DynamicsSettings) -> Self {
        let mut dynamics = create_dynamics(kind, &settings);
        dynamics.reset(&[], viewport);
        Self {
            entities: Vec::new(),
            hold: None,
            viewport,
            dynamics,
            settings,
        }
    }

    /// Apply one event
    pub fn handle(&mut self, event: InputEvent) {
        match event {
            InputEvent::Loaded(report) => {
                log::info!(
                    "Loaded {} entities ({} rows rejected)",
                    report.records.len(),
                    report.rejected_count()
                );
                self.reset(&report.records);
            }
            InputEvent::PointerDown(point) => {
                self.pointer_down(point);
            }
            InputEvent::PointerMove(point) => self.pointer_move(point),
            InputEvent::PointerUp | InputEvent::PointerLeave => self.pointer_up(),
            InputEvent::Resize(viewport) => self.resize(viewport),
            InputEvent::Tick(dt) => self.update(dt),
        }
    }

    /// Replace every entity with ones built from `records`
    ///
    /// Any hold is released, since its index referred to the old list.
    pub fn reset(&mut self, records: &[EntityRecord]) {
        if self.hold.take().is_some() {
            self.dynamics.release();
        }
        self.entities = records.iter().map(Entity::from_record).collect();
        self.dynamics.reset(&self.entities, self.viewport);
    }

    /// Grab the topmost entity under `point`, returning its index
    pub fn pointer_down(&mut self, point: Vec2) -> Option<usize> {
        let index = pick(&self.entities, point)?;
        let offset = point - self.entities[index].position;
        self.hold = Some(Hold { index, offset });
        self.dynamics.grab(index, offset, point);
        log::debug!("Grabbed entity {} ({:?})", index, self.entities[index].label());
        Some(index)
    }

    /// Move the held entity so the grab offset is preserved
    pub fn pointer_move(&mut self, point: Vec2) {
        let Some(hold) = self.hold else {
            return;
        };
        if let Some(entity) = self.entities.get_mut(hold.index) {
            entity.position = point - hold.offset;
        }
        self.dynamics.drag(point);
    }

    /// Let go of the held entity, if any
    pub fn pointer_up(&mut self) {
        if self.hold.take().is_some() {
            self.dynamics.release();
        }
    }

    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.dynamics.resize(&self.entities, viewport);
    }

    /// Advance the active strategy by one frame
    pub fn update(&mut self, dt: f32) {
        let held = self.hold.map(|hold| hold.index);
        self.dynamics.step(&mut self.entities, held, dt);
    }

    /// Swap in a different strategy, restarting it from the current positions
    pub fn set_dynamics(&mut self, kind: DynamicsKind) {
        if self.hold.take().is_some() {
            self.dynamics.release();
        }
        for entity in &mut self.entities {
            entity.vertical_velocity = 0.0;
        }
        self.dynamics = create_dynamics(kind, &self.settings);
        self.dynamics.reset(&self.entities, self.viewport);
        log::info!("Dynamics: {}", self.dynamics.name());
    }

    /// Switch to the next strategy in [`DynamicsKind::next`] order
    pub fn cycle_dynamics(&mut self) -> DynamicsKind {
        let next = self.dynamics.kind().next();
        self.set_dynamics(next);
        next
    }

    /// Draw one frame: every circle, then every label on top
    pub fn draw<R: Renderer + ?Sized>(&self, renderer: &mut R) {
        renderer.clear();
        for entity in &self.entities {
            renderer.draw_circle(entity.position, entity.radius(), entity.fill());
        }
        for entity in &self.entities {
            draw_label(renderer, entity);
        }
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn hold(&self) -> Option<Hold> {
        self.hold
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn dynamics_kind(&self) -> DynamicsKind {
        self.dynamics.kind()
    }

    pub fn settings(&self) -> &DynamicsSettings {
        &self.settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{DrawCommand, FrameRecorder};

    fn record(x: f32, y: f32, radius: f32, label: &str) -> EntityRecord {
        EntityRecord {
            x,
            y,
            radius,
            color: "red".to_string(),
            label: label.to_string(),
        }
    }

    fn state_with(records: &[EntityRecord]) -> SimulationState {
        let mut state = SimulationState::new(
            Viewport::new(800.0, 600.0),
            DynamicsKind::Gravity,
            DynamicsSettings::default(),
        );
        state.reset(records);
        state
    }

    #[test]
    fn test_pointer_down_misses() {
        let mut state = state_with(&[record(100.0, 100.0, 10.0, "A")]);
        assert_eq!(state.pointer_down(Vec2::new(300.0, 300.0)), None);
        assert!(state.hold().is_none());
    }

    #[test]
    fn test_move_without_hold_is_noop() {
        let mut state = state_with(&[record(100.0, 100.0, 10.0, "A")]);
        state.pointer_move(Vec2::new(5.0, 5.0));
        assert_eq!(state.entities()[0].position, Vec2::new(100.0, 100.0));
    }

    #[test]
    fn test_release_resumes_physics() {
        let mut state = state_with(&[record(100.0, 100.0, 10.0, "A")]);
        state.handle(InputEvent::PointerDown(Vec2::new(100.0, 100.0)));
        state.handle(InputEvent::Tick(0.016));
        assert_eq!(state.entities()[0].position.y, 100.0);

        state.handle(InputEvent::PointerLeave);
        state.handle(InputEvent::Tick(0.016));
        assert_eq!(state.entities()[0].position.y, 100.5);
    }

    #[test]
    fn test_reset_releases_hold() {
        let mut state = state_with(&[record(100.0, 100.0, 10.0, "A")]);
        state.pointer_down(Vec2::new(100.0, 100.0));
        assert!(state.hold().is_some());

        state.reset(&[record(1.0, 1.0, 1.0, "B")]);
        assert!(state.hold().is_none());
        assert_eq!(state.entities().len(), 1);
        assert_eq!(state.entities()[0].label(), "B");
    }

    #[test]
    fn test_draw_labels_after_circles() {
        let state = state_with(&[record(10.0, 10.0, 4.0, "A"), record(20.0, 20.0, 6.0, "B")]);
        let mut recorder = FrameRecorder::new();

        state.draw(&mut recorder);

        let commands = recorder.commands();
        assert_eq!(commands.len(), 5);
        assert_eq!(commands[0], DrawCommand::Clear);
        assert!(matches!(commands[1], DrawCommand::Circle { .. }));
        assert!(matches!(commands[2], DrawCommand::Circle { .. }));
        assert_eq!(
            commands[4],
            DrawCommand::Text {
                text: "B".to_string(),
                center: Vec2::new(20.0, 20.0),
                font_size: 3.0,
            }
        );
    }

    #[test]
    fn test_cycle_dynamics_keeps_entities() {
        let mut state = state_with(&[record(100.0, 100.0, 10.0, "A")]);
        assert_eq!(state.cycle_dynamics(), DynamicsKind::Wrap);
        assert_eq!(state.dynamics_kind(), DynamicsKind::Wrap);
        assert_eq!(state.entities()[0].position, Vec2::new(100.0, 100.0));
        assert_eq!(state.cycle_dynamics(), DynamicsKind::Walls);
        assert_eq!(state.cycle_dynamics(), DynamicsKind::Gravity);
    }

    #[test]
    fn test_resize_moves_floor() {
        let mut state = state_with(&[record(100.0, 85.0, 10.0, "A")]);
        state.handle(InputEvent::Resize(Viewport::new(800.0, 95.0)));
        state.entities[0].vertical_velocity = 1.0;

        state.update(0.016);

        // 85 + 10 + 1 > 95: bounced
        assert!(state.entities()[0].vertical_velocity < 0.0);
        assert_eq!(state.viewport().height, 95.0);
    }
}
