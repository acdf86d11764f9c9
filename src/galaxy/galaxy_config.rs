use bevy::prelude::*;

#[derive(Resource, Clone, PartialEq, Debug)]
pub struct GalaxyParameters {
    pub count: u32,
    pub size: f32,
    pub radius: f32,
    pub branches: u32,
    pub spin: f32,
    // Exposed in the panel but not read by the generator
    pub randomness: f32,
    pub randomness_power: f32,
    pub inside_color: Srgba,
    pub outside_color: Srgba,
}

impl Default for GalaxyParameters {
    fn default() -> Self {
        Self {
            count: 100_000,
            size: 0.01,
            radius: 5.0,
            branches: 3,
            spin: 1.0,
            randomness: 0.2,
            randomness_power: 3.0,
            inside_color: Srgba::rgb_u8(0xff, 0x60, 0x30),
            outside_color: Srgba::rgb_u8(0x1b, 0x39, 0x84),
        }
    }
}

impl GalaxyParameters {
    pub const MIN: Self = Self {
        count: 1,
        size: 0.01,
        radius: 0.01,
        branches: 2,
        spin: -5.0,
        randomness: 0.0,
        randomness_power: 1.0,
        inside_color: Srgba::BLACK,
        outside_color: Srgba::BLACK,
    };
    pub const MAX: Self = Self {
        count: 100_000,
        size: 0.1,
        radius: 20.0,
        branches: 20,
        spin: 5.0,
        randomness: 2.0,
        randomness_power: 10.0,
        inside_color: Srgba::WHITE,
        outside_color: Srgba::WHITE,
    };
    // colors have no step, the fields are only there to complete the struct
    pub const STEP: Self = Self {
        count: 1,
        size: 0.001,
        radius: 0.01,
        branches: 1,
        spin: 1.0,
        randomness: 0.001,
        randomness_power: 0.001,
        inside_color: Srgba::NONE,
        outside_color: Srgba::NONE,
    };

    /// Copy of the parameters with every numeric field pulled into the panel bounds.
    pub fn clamped(&self) -> Self {
        let (min, max) = (Self::MIN, Self::MAX);
        Self {
            count: self.count.clamp(min.count, max.count),
            size: self.size.clamp(min.size, max.size),
            radius: self.radius.clamp(min.radius, max.radius),
            branches: self.branches.clamp(min.branches, max.branches),
            spin: self.spin.clamp(min.spin, max.spin),
            randomness: self.randomness.clamp(min.randomness, max.randomness),
            randomness_power: self
                .randomness_power
                .clamp(min.randomness_power, max.randomness_power),
            inside_color: self.inside_color,
            outside_color: self.outside_color,
        }
    }
}

/// Last parameter set handed to the generator.
/// Consumers cache `generation` and rebuild whenever it moves.
#[derive(Resource, Clone, Debug)]
pub struct CommittedParameters {
    pub params: GalaxyParameters,
    pub generation: i32,
}

impl Default for CommittedParameters {
    fn default() -> Self {
        Self {
            params: GalaxyParameters::default(),
            generation: 0,
        }
    }
}

/// Set by the panel while a control is dragged or typed into.
#[derive(Resource, Default, Debug)]
pub struct ParameterEditState {
    pub editing: bool,
}

/// Forces a fresh draw even if no parameter changed.
#[derive(Event, Default, Debug)]
pub struct RegenerateGalaxy;

pub struct GalaxyConfigPlugin;

impl Plugin for GalaxyConfigPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(GalaxyParameters::default())
            .insert_resource(CommittedParameters::default())
            .insert_resource(ParameterEditState::default())
            .add_event::<RegenerateGalaxy>()
            .add_systems(Update, commit_parameter_changes);
    }
}

fn commit_parameter_changes(
    params: Res<GalaxyParameters>,
    edit_state: Res<ParameterEditState>,
    mut committed: ResMut<CommittedParameters>,
    mut regenerate_events: EventReader<RegenerateGalaxy>,
) {
    let requested = regenerate_events.read().count() > 0;

    if edit_state.editing && !requested {
        return;
    }

    let params = params.clamped();
    if requested || params != committed.params {
        committed.params = params;
        committed.generation += 1;
        info!(
            "Galaxy parameters committed (generation {}): {} particles, {} branches, radius {}",
            committed.generation,
            committed.params.count,
            committed.params.branches,
            committed.params.radius
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> App {
        let mut app = App::new();
        app.add_plugins(GalaxyConfigPlugin);
        app.update();
        app
    }

    fn generation(app: &App) -> i32 {
        app.world().resource::<CommittedParameters>().generation
    }

    #[test]
    fn defaults_sit_inside_bounds() {
        let params = GalaxyParameters::default();
        assert_eq!(params.clamped(), params);
    }

    #[test]
    fn clamped_pulls_fields_into_bounds() {
        let params = GalaxyParameters {
            count: 0,
            branches: 100,
            spin: -12.0,
            randomness_power: 0.5,
            ..default()
        }
        .clamped();

        assert_eq!(params.count, 1);
        assert_eq!(params.branches, 20);
        assert_eq!(params.spin, -5.0);
        assert_eq!(params.randomness_power, 1.0);
    }

    #[test]
    fn unchanged_parameters_do_not_commit() {
        let mut app = app();
        let start = generation(&app);

        app.update();
        app.update();

        assert_eq!(generation(&app), start);
    }

    #[test]
    fn commit_waits_until_editing_ends() {
        let mut app = app();
        let start = generation(&app);

        app.world_mut().resource_mut::<ParameterEditState>().editing = true;
        app.world_mut().resource_mut::<GalaxyParameters>().branches = 7;
        app.update();
        assert_eq!(generation(&app), start);

        app.world_mut().resource_mut::<ParameterEditState>().editing = false;
        app.update();
        assert_eq!(generation(&app), start + 1);
        assert_eq!(
            app.world().resource::<CommittedParameters>().params.branches,
            7
        );
    }

    #[test]
    fn regenerate_event_bumps_generation() {
        let mut app = app();
        let start = generation(&app);

        app.world_mut().send_event(RegenerateGalaxy);
        app.update();

        assert_eq!(generation(&app), start + 1);
    }

    #[test]
    fn committed_copy_is_clamped() {
        let mut app = app();
        let start = generation(&app);

        app.world_mut().resource_mut::<GalaxyParameters>().count = 0;
        app.update();

        let committed = app.world().resource::<CommittedParameters>();
        assert_eq!(committed.generation, start + 1);
        assert_eq!(committed.params.count, GalaxyParameters::MIN.count);
        // the live copy is left alone
        assert_eq!(app.world().resource::<GalaxyParameters>().count, 0);
    }
}
