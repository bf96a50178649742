use egui::{Color32, Rect, Sense, pos2};

use crate::SketchApp;

pub fn central_panel(app: &mut SketchApp, ctx: &egui::Context) {
    egui::CentralPanel::default().show(ctx, |ui| {
        let (response, painter) = ui.allocate_painter(ui.available_size(), Sense::click_and_drag());
        let canvas_rect = response.rect;

        app.mount_if_needed(canvas_rect, ctx.pixels_per_point());
        app.engine.borrow_mut().set_display_rect(canvas_rect);
        app.translator.set_canvas(canvas_rect, ui.layer_id());

        // Handle input. Listeners borrow the engine themselves, so no borrow may be held here.
        for event in app.translator.collect(ctx) {
            app.bus.emit(&event);
        }

        // Render the canvas
        let engine = app.engine.borrow();
        if let Some(surface) = engine.surface() {
            let texture_id = app.texture.sync(ctx, surface);
            let uv = Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0));
            painter.image(texture_id, canvas_rect, uv, Color32::WHITE);
        }
    });
}
