slint::include_modules!();

mod callbacks;
mod config;
mod gallery;
mod geometry;
mod mark;
mod render;
mod repository;
mod session;
mod state;
mod utils;

use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;
use std::sync::mpsc;
use std::time::Duration;

use slint::{ComponentHandle, TimerMode, VecModel};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use callbacks::AppCtx;
use gallery::Gallery;
use mark::{MarkColor, MarkKind, MarkShape};
use repository::{JsonMarkRepository, MarkEvent, MarkRepository};
use session::Session;
use state::{LoadedImage, MarkStore};

fn main() -> Result<(), slint::PlatformError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut app_config = config::load_config();

    let ui = AppWindow::new()?;

    // Shared state. Everything lives on the UI event loop; no locking.
    let session = Rc::new(RefCell::new(Session::new(
        MarkKind::parse(&app_config.drawing.default_shape).unwrap_or(MarkKind::Rect),
        MarkColor::parse(&app_config.drawing.default_color).unwrap_or(MarkColor::Blue),
    )));
    let store = Rc::new(RefCell::new(MarkStore::new()));
    let loaded: Rc<RefCell<Option<LoadedImage>>> = Rc::new(RefCell::new(None));
    let repository: Rc<dyn MarkRepository> = Rc::new(JsonMarkRepository::new());
    let gallery: Rc<RefCell<Option<Gallery>>> = Rc::new(RefCell::new(None));
    let subscription: Rc<RefCell<Option<mpsc::Receiver<MarkEvent>>>> =
        Rc::new(RefCell::new(None));
    let author = Rc::new(app_config.identity.display_name.clone());
    let stroke_width = app_config.drawing.stroke_width;

    {
        let session = session.borrow();
        ui.set_current_shape(session.tool.name().into());
        ui.set_current_color(session.color.name().into());
    }

    // Open gallery from CLI arg (image file or folder).
    let args: Vec<String> = std::env::args().collect();
    if let Some(arg) = args.get(1) {
        match Gallery::open(Path::new(arg)) {
            Ok(g) => {
                info!(path = %arg, images = g.len(), "gallery opened");
                *gallery.borrow_mut() = Some(g);
                config::add_recent_path(&mut app_config, arg.clone());
                if let Err(e) = config::save_config(&app_config) {
                    warn!("Failed to save config: {e}");
                }
            }
            Err(e) => {
                warn!("gallery open failed: {e}");
                ui.set_status_text(format!("Gallery error: {e}").into());
            }
        }
    } else {
        ui.set_status_text("No image provided (pass a file or folder as first arg)".into());
    }

    // Recomposite the canvas frame: base image + marks + optional preview.
    let redraw: Rc<dyn Fn(Option<(MarkShape, MarkColor)>)> = {
        let ui_weak = ui.as_weak();
        let loaded = loaded.clone();
        let store = store.clone();
        Rc::new(move |preview| {
            let Some(ui) = ui_weak.upgrade() else { return };
            let loaded_ref = loaded.borrow();
            let store_ref = store.borrow();
            match render::render_frame(
                loaded_ref.as_ref().map(|l| &l.image),
                store_ref.as_slice(),
                preview,
                stroke_width,
            ) {
                Some(frame) => ui.set_canvas_source(utils::frame_to_image(&frame)),
                None => ui.set_canvas_source(utils::placeholder_image()),
            }
        })
    };

    // Rebuild the sidebar rows from the mark store.
    let refresh_rows: Rc<dyn Fn()> = {
        let ui_weak = ui.as_weak();
        let store = store.clone();
        Rc::new(move || {
            let Some(ui) = ui_weak.upgrade() else { return };
            let store_ref = store.borrow();
            let rows: Vec<MarkRow> = store_ref
                .as_slice()
                .iter()
                .map(|m| MarkRow {
                    label: m.shape.label().into(),
                    tint: utils::mark_tint(m.color),
                    author: m.author.clone().into(),
                    snippet: m.comment.clone().unwrap_or_default().into(),
                })
                .collect();
            ui.set_marks(Rc::new(VecModel::from(rows)).into());
        })
    };

    // Shared loader used by navigation callbacks to display the image and
    // its marks at a given gallery index.
    let loader: Rc<dyn Fn(usize)> = {
        let ui_weak = ui.as_weak();
        let gallery = gallery.clone();
        let loaded = loaded.clone();
        let store = store.clone();
        let repository = repository.clone();
        let subscription = subscription.clone();
        let redraw = redraw.clone();
        let refresh_rows = refresh_rows.clone();
        Rc::new(move |index: usize| {
            let path = {
                let mut gallery_ref = gallery.borrow_mut();
                let Some(g) = gallery_ref.as_mut() else { return };
                g.set_index(index);
                g.current().to_path_buf()
            };

            let status = match image::open(&path) {
                Ok(img) => {
                    *loaded.borrow_mut() = Some(LoadedImage {
                        path: path.clone(),
                        image: img.to_rgba8(),
                    });
                    format!("Loaded {}", path.display())
                }
                Err(e) => {
                    // Rendering stays suspended; the placeholder is shown
                    // and the failure is surfaced on the status line.
                    warn!(path = %path.display(), "image load failed: {e}");
                    *loaded.borrow_mut() = None;
                    format!("Image failed to load: {e}")
                }
            };

            let marks = match repository.list_marks(&path) {
                Ok(marks) => marks,
                Err(e) => {
                    warn!("mark list failed: {e}");
                    if let Some(ui) = ui_weak.upgrade() {
                        ui.set_status_text(format!("Could not load marks: {e}").into());
                    }
                    Vec::new()
                }
            };
            store.borrow_mut().replace(marks);
            *subscription.borrow_mut() = Some(repository.subscribe(&path));

            refresh_rows();
            redraw(None);

            if let Some(ui) = ui_weak.upgrade() {
                let fname = path
                    .file_name()
                    .and_then(|f| f.to_str())
                    .unwrap_or("?");
                ui.set_image_name(fname.into());
                ui.set_image_aspect(
                    loaded.borrow().as_ref().map(|l| l.aspect()).unwrap_or(1.0),
                );
                if let Some(g) = gallery.borrow().as_ref() {
                    ui.set_gallery_position(g.position_label().into());
                }
                ui.set_status_text(status.into());
            }
        })
    };

    // Load first image if a gallery is present.
    (loader)(0);

    let ctx = AppCtx {
        session: session.clone(),
        store: store.clone(),
        loaded: loaded.clone(),
        repository: repository.clone(),
        author,
        redraw: redraw.clone(),
        refresh_rows: refresh_rows.clone(),
    };

    callbacks::drawing::setup_drawing_callbacks(&ui, &ctx);
    callbacks::marks::setup_mark_callbacks(&ui, &ctx);
    callbacks::navigation::setup_navigation_callbacks(&ui, loader, gallery);

    // Subscription backstop: drain change events and reload the mark set,
    // keeping the local mirror eventually consistent with the sidecar.
    let poll_timer = slint::Timer::default();
    {
        let loaded = loaded.clone();
        let store = store.clone();
        let repository = repository.clone();
        poll_timer.start(
            TimerMode::Repeated,
            Duration::from_millis(500),
            move || {
                let changed = subscription
                    .borrow()
                    .as_ref()
                    .map(|rx| rx.try_iter().count() > 0)
                    .unwrap_or(false);
                if !changed {
                    return;
                }
                let path = {
                    let loaded_ref = loaded.borrow();
                    let Some(image) = loaded_ref.as_ref() else { return };
                    image.path.clone()
                };
                match repository.list_marks(&path) {
                    Ok(marks) => {
                        store.borrow_mut().replace(marks);
                        refresh_rows();
                        redraw(None);
                    }
                    Err(e) => warn!("mark reload failed: {e}"),
                }
            },
        );
    }

    ui.run()
}
