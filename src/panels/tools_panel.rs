use egui::color_picker::{Alpha, color_edit_button_srgba};

use crate::SketchApp;
use crate::app::css_hex;
use crate::tools::{Tool, ToolSelection};

pub fn tools_panel(app: &mut SketchApp, ctx: &egui::Context) {
    egui::SidePanel::left("tools_panel")
        .resizable(true)
        .default_width(200.0)
        .show(ctx, |ui| {
            ui.heading("Tools");

            let mut engine = app.engine.borrow_mut();
            let active_tool = engine.state().tool.tool();

            for tool in Tool::ALL {
                if ui.selectable_label(active_tool == Some(tool), tool.label()).clicked() {
                    log::info!("Tool selected from UI: {}", tool.name());
                    engine.select_tool(tool);
                }
            }
            if let ToolSelection::Unrecognized(name) = &engine.state().tool {
                ui.colored_label(ui.visuals().warn_fg_color, format!("Unknown tool: {name}"));
            }
            ui.separator();

            let mut style = engine.state().style;
            let mut apply_color_text = false;
            ui.horizontal(|ui| {
                ui.label("Color:");
                if color_edit_button_srgba(ui, &mut style.color, Alpha::Opaque).changed() {
                    engine.set_color(style.color);
                    app.color_input = css_hex(engine.state().style.color);
                    app.color_error = None;
                }
                let text = ui.add(egui::TextEdit::singleline(&mut app.color_input).desired_width(72.0));
                apply_color_text = text.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
            });
            if let Some(error) = &app.color_error {
                ui.colored_label(ui.visuals().error_fg_color, error);
            }
            ui.horizontal(|ui| {
                ui.label("Thickness:");
                if ui.add(egui::Slider::new(&mut style.stroke_width, 1.0..=50.0)).changed() {
                    engine.set_stroke_width(style.stroke_width);
                }
            });
            if ui.checkbox(&mut style.fill_enabled, "Fill shapes").changed() {
                engine.set_fill_enabled(style.fill_enabled);
            }
            ui.separator();

            // Undo/Clear section
            ui.horizontal(|ui| {
                if ui.add_enabled(engine.can_undo(), egui::Button::new("Undo")).clicked() {
                    engine.undo();
                }
                if ui.add_enabled(engine.is_mounted(), egui::Button::new("Clear")).clicked() {
                    engine.clear();
                }
            });
            let history = engine.history();
            ui.label(format!(
                "Undo stack size: {} ({} KiB)",
                history.len(),
                history.memory_bytes() / 1024
            ));
            drop(engine);
            if apply_color_text {
                app.apply_color_input();
            }

            ui.separator();
            ui.horizontal(|ui| {
                ui.label("Author:");
                ui.text_edit_singleline(&mut app.settings.author);
            });
            if ui.button("Save").clicked() {
                app.save_drawing();
            }
            if let Some(status) = &app.status {
                ui.label(status);
            }

            egui::CollapsingHeader::new("Saved pictures")
                .default_open(false)
                .show(ui, |ui| {
                    ui.horizontal(|ui| {
                        ui.label("Search:");
                        if ui.text_edit_singleline(&mut app.gallery_query).changed() {
                            app.refresh_recent();
                        }
                    });
                    if app.recent.is_empty() {
                        ui.weak("Nothing saved yet");
                    }
                    for record in &app.recent {
                        ui.label(format!(
                            "{} on {}",
                            record.user_email,
                            record.date.format("%Y-%m-%d %H:%M")
                        ));
                    }
                    if app.has_more_pictures && ui.button("Load more").clicked() {
                        app.load_more_pictures();
                    }
                });
        });
}
