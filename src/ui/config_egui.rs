use super::PanelPointerCapture;
use crate::prelude::*;
use bevy::color::ColorToPacked;
use bevy::diagnostic::{DiagnosticsStore, FrameTimeDiagnosticsPlugin};
use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

pub struct ConfigEguiPlugin;

impl Plugin for ConfigEguiPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, configure_visuals_system)
            .add_systems(Update, ui_system);
    }
}

fn configure_visuals_system(mut contexts: EguiContexts) {
    contexts.ctx_mut().set_visuals(egui::Visuals {
        window_corner_radius: 0.0.into(),
        ..egui::Visuals::dark()
    });
}

fn color_ui(label: &str, color: &mut Srgba, ui: &mut egui::Ui) {
    ui.horizontal(|ui| {
        let mut rgb = color.to_u8_array_no_alpha();
        if egui::color_picker::color_edit_button_srgb(ui, &mut rgb).changed() {
            *color = Srgba::rgb_u8(rgb[0], rgb[1], rgb[2]);
        }
        ui.label(format!("{label} {}", color.to_hex()));
    });
}

fn parameters_ui(params: &mut GalaxyParameters, ui: &mut egui::Ui) {
    let minval = GalaxyParameters::MIN;
    let maxval = GalaxyParameters::MAX;
    let step = GalaxyParameters::STEP;

    ui.add(
        egui::Slider::new(&mut params.count, minval.count..=maxval.count)
            .step_by(step.count as f64)
            .logarithmic(true)
            .text("Count"),
    );
    ui.add(
        egui::Slider::new(&mut params.size, minval.size..=maxval.size)
            .step_by(step.size as f64)
            .text("Size"),
    );
    ui.add(
        egui::Slider::new(&mut params.radius, minval.radius..=maxval.radius)
            .step_by(step.radius as f64)
            .text("Radius"),
    );
    ui.add(
        egui::Slider::new(&mut params.branches, minval.branches..=maxval.branches)
            .step_by(step.branches as f64)
            .text("Branches"),
    );
    ui.add(
        egui::Slider::new(&mut params.spin, minval.spin..=maxval.spin)
            .step_by(step.spin as f64)
            .text("Spin"),
    );
    ui.add(
        egui::Slider::new(&mut params.randomness, minval.randomness..=maxval.randomness)
            .step_by(step.randomness as f64)
            .text("Randomness"),
    )
    .on_hover_text("Legacy control, the scatter is shaped by Randomness Power only");
    ui.add(
        egui::Slider::new(
            &mut params.randomness_power,
            minval.randomness_power..=maxval.randomness_power,
        )
        .step_by(step.randomness_power as f64)
        .text("Randomness Power"),
    );

    color_ui("Inside", &mut params.inside_color, ui);
    color_ui("Outside", &mut params.outside_color, ui);
}

fn frame_rate_label(diagnostics: &DiagnosticsStore) -> String {
    let fps = diagnostics
        .get(&FrameTimeDiagnosticsPlugin::FPS)
        .and_then(|fps| fps.smoothed())
        .unwrap_or(0.0);
    let frame_time = diagnostics
        .get(&FrameTimeDiagnosticsPlugin::FRAME_TIME)
        .and_then(|frame_time| frame_time.smoothed())
        .unwrap_or(0.0);

    format!("FPS: {fps:.1} ({frame_time:.2} ms)")
}

fn ui_system(
    mut contexts: EguiContexts,
    mut params: ResMut<GalaxyParameters>,
    mut edit_state: ResMut<ParameterEditState>,
    mut pointer_capture: ResMut<PanelPointerCapture>,
    committed: Res<CommittedParameters>,
    viewport: Res<ViewportSize>,
    diagnostics: Res<DiagnosticsStore>,
    mut regenerate: EventWriter<RegenerateGalaxy>,
) {
    let ctx = contexts.ctx_mut();

    egui::SidePanel::right("galaxy_panel")
        .default_width(360.0)
        .show(ctx, |ui| {
            ui.heading("Galaxy");

            egui::CollapsingHeader::new("Generator")
                .default_open(true)
                .show(ui, |ui| {
                    parameters_ui(&mut params, ui);
                });
            ui.separator();

            if ui.button("Regenerate").clicked() {
                regenerate.write(RegenerateGalaxy);
            }
            ui.label(format!(
                "Particles: {}  Generation: {}",
                committed.params.count, committed.generation
            ));
            ui.label(format!("Viewport: {:.0}x{:.0}", viewport.width, viewport.height));
            ui.label(frame_rate_label(&diagnostics));
        });

    // Commits wait for the drag to end or the text field to lose focus
    edit_state.editing = ctx.is_using_pointer() || ctx.wants_keyboard_input();
    pointer_capture.0 = ctx.wants_pointer_input() || ctx.is_pointer_over_area();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_rate_label_without_samples() {
        let diagnostics = DiagnosticsStore::default();
        assert_eq!(frame_rate_label(&diagnostics), "FPS: 0.0 (0.00 ms)");
    }
}
