use std::cell::RefCell;
use std::rc::Rc;

use crate::canvas_texture::CanvasTexture;
use crate::engine::DrawingEngine;
use crate::event::{EventBus, SurfaceListeners};
use crate::input::PointerTranslator;
use crate::panels::{central_panel, tools_panel};
use crate::persistence::{DEFAULT_PAGE_SIZE, PictureRecord, PictureStore, save_picture};
use crate::state::SketchSettings;
use crate::util::time;

pub struct SketchApp {
    pub(crate) settings: SketchSettings,
    pub(crate) engine: Rc<RefCell<DrawingEngine>>,
    pub(crate) bus: Rc<EventBus>,
    // Dropping the app drops these, which unregisters every pointer listener
    pub(crate) listeners: Option<SurfaceListeners>,
    pub(crate) translator: PointerTranslator,
    pub(crate) texture: CanvasTexture,
    store: Box<dyn PictureStore>,
    pub(crate) recent: Vec<PictureRecord>,
    // Gallery filter; when non-empty every matching picture is listed at once
    pub(crate) gallery_query: String,
    pub(crate) has_more_pictures: bool,
    pub(crate) color_input: String,
    pub(crate) color_error: Option<String>,
    pub(crate) status: Option<String>,
}

impl SketchApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let settings: SketchSettings = cc
            .storage
            .and_then(|storage| eframe::get_value(storage, eframe::APP_KEY))
            .unwrap_or_default();
        let settings = settings.with_env_overrides();
        let store = default_store(&settings);
        Self::from_settings(settings, store)
    }

    pub fn from_settings(settings: SketchSettings, store: Box<dyn PictureStore>) -> Self {
        let engine = Rc::new(RefCell::new(DrawingEngine::new(settings.drawing.clone())));
        let mut app = Self {
            settings,
            engine,
            bus: EventBus::new(),
            listeners: None,
            translator: PointerTranslator::new(),
            texture: CanvasTexture::new(),
            store,
            recent: Vec::new(),
            gallery_query: String::new(),
            has_more_pictures: false,
            color_input: String::new(),
            color_error: None,
            status: None,
        };
        app.sync_color_input();
        app.refresh_recent();
        app
    }

    pub fn engine(&self) -> &Rc<RefCell<DrawingEngine>> {
        &self.engine
    }

    pub fn settings(&self) -> &SketchSettings {
        &self.settings
    }

    pub fn recent_pictures(&self) -> &[PictureRecord] {
        &self.recent
    }

    pub fn color_input(&self) -> &str {
        &self.color_input
    }

    /// Text of the CSS color field, applied by [`Self::apply_color_input`]
    pub fn color_input_mut(&mut self) -> &mut String {
        &mut self.color_input
    }

    pub fn color_error(&self) -> Option<&str> {
        self.color_error.as_deref()
    }

    /// Whether the unfiltered gallery may have another page
    pub fn has_more_pictures(&self) -> bool {
        self.has_more_pictures
    }

    /// Create the surface on the first frame the canvas has a real size, then start listening
    pub(crate) fn mount_if_needed(&mut self, rect: egui::Rect, pixels_per_point: f32) {
        if self.engine.borrow().surface().is_some() {
            return;
        }
        let width = (rect.width() * pixels_per_point).round();
        let height = (rect.height() * pixels_per_point).round();
        if width < 1.0 || height < 1.0 {
            return;
        }

        self.engine.borrow_mut().mount(width as u32, height as u32);
        self.listeners = Some(SurfaceListeners::attach(&self.bus, &self.engine));
    }

    /// Stop routing pointer events to the engine
    pub fn detach_listeners(&mut self) {
        if let Some(listeners) = self.listeners.take() {
            listeners.detach();
        }
    }

    pub fn save_drawing(&mut self) {
        let timestamp = time::timestamp_millis();
        let result = save_picture(
            &self.engine.borrow(),
            self.store.as_mut(),
            &self.settings.author,
            timestamp,
        );
        match result {
            Ok(_) => {
                self.status = Some("Picture successfully saved!".to_owned());
                self.refresh_recent();
            }
            Err(err) => {
                log::error!("Failed to save picture: {err}");
                self.status = Some("Error! Try again or reload the page!".to_owned());
            }
        }
    }

    /// Reload the gallery from its first page, or from the search results when filtering
    pub fn refresh_recent(&mut self) {
        let query = self.gallery_query.trim();
        let result = if query.is_empty() {
            self.store.list_page(None, DEFAULT_PAGE_SIZE)
        } else {
            self.store.search_by_user(query)
        };
        match result {
            Ok(records) => {
                self.has_more_pictures = query.is_empty() && records.len() == DEFAULT_PAGE_SIZE;
                self.recent = records;
            }
            Err(err) => {
                log::warn!("Failed to list saved pictures: {err}");
                self.recent.clear();
                self.has_more_pictures = false;
            }
        }
    }

    /// Append the page after the last listed picture
    pub fn load_more_pictures(&mut self) {
        if !self.has_more_pictures {
            return;
        }
        let after = self.recent.last().map(PictureRecord::cursor);
        match self.store.list_page(after, DEFAULT_PAGE_SIZE) {
            Ok(page) => {
                self.has_more_pictures = page.len() == DEFAULT_PAGE_SIZE;
                self.recent.extend(page);
            }
            Err(err) => log::warn!("Failed to load more pictures: {err}"),
        }
    }

    /// Filter the gallery by author. An empty query goes back to paging.
    pub fn search_pictures(&mut self, query: &str) {
        self.gallery_query = query.to_owned();
        self.refresh_recent();
    }

    /// Apply a CSS color typed by the user
    pub fn apply_color_input(&mut self) {
        let result = self.engine.borrow_mut().set_color_css(&self.color_input);
        match result {
            Ok(_) => {
                self.color_error = None;
                self.sync_color_input();
            }
            Err(err) => self.color_error = Some(err.to_string()),
        }
    }

    /// Show the current brush color in the color text field
    pub(crate) fn sync_color_input(&mut self) {
        let color = self.engine.borrow().state().style.color;
        self.color_input = css_hex(color);
    }

    /// Lay out one frame
    pub fn show(&mut self, ctx: &egui::Context) {
        tools_panel(self, ctx);
        central_panel(self, ctx);
    }
}

/// `#rrggbb` text for an opaque color
pub(crate) fn css_hex(color: egui::Color32) -> String {
    format!("#{:02x}{:02x}{:02x}", color.r(), color.g(), color.b())
}

#[cfg(not(target_arch = "wasm32"))]
fn default_store(settings: &SketchSettings) -> Box<dyn PictureStore> {
    let store = crate::persistence::JsonDirectoryStore::new(settings.pictures_dir.clone());
    log::info!("Saving pictures to {}", store.dir().display());
    Box::new(store)
}

#[cfg(target_arch = "wasm32")]
fn default_store(_settings: &SketchSettings) -> Box<dyn PictureStore> {
    Box::new(crate::persistence::MemoryPictureStore::new())
}

impl eframe::App for SketchApp {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        self.settings.drawing = self.engine.borrow().state().clone();
        eframe::set_value(storage, eframe::APP_KEY, &self.settings);
    }

    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.show(ctx);
    }
}
