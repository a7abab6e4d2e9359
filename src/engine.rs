//=========================================================================
// Graphics Engine
//
// Frame pipeline and public entry point of the sprite engine.
//
// Architecture:
// ```text
//     EngineBuilder  ──build(platform)──>  GraphicsEngine<P>
//         │                                   │
//         ├─ with_size()                      ├─ check_events()   PollEvents
//         ├─ with_color_depth()               ├─ update_game()    UpdateObjects + widget refresh
//         ├─ with_title()                     ├─ refresh_screen() Composite + BufferSwap
//         └─ with_quit_policy()               └─ run_frame() / run()
// ```
//
// Each phase runs to completion before the next one starts. Everything
// happens on the caller's thread; the engine never spawns work.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crossbeam_channel::Sender;
use log::{debug, info, trace, warn};
use winit::keyboard::Key;

//=== Internal Dependencies ===============================================

use crate::core::animation::Animation;
use crate::core::input::{InputDispatcher, KeyPhase, KeyboardListener, MouseListener};
use crate::core::platform_bridge::{Platform, PlatformError, PlatformEvent};
use crate::core::render::{Background, CompositeReport, Compositor};
use crate::core::scene::{
    ObjectHandle, ObjectKind, SceneObject, SceneRegistry, SharedObject, SharedWidget, WidgetHandle,
    WidgetRegistry,
};
use crate::core::surface::{Color, Surface};
use crate::core::timing::{FrameTimings, LoopTimer, TickControl};
use crate::platform::SoftwarePlatform;

//=== QuitPolicy ==========================================================

/// What the event phase does when the platform reports a quit request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuitPolicy {
    /// Shut the platform down and exit the process with status 0.
    ExitProcess,

    /// Shut the platform down and return [`TickControl::Exit`].
    ReturnToCaller,
}

//=== EngineError =========================================================

/// Errors reported by engine operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// A static object's image could not be decoded.
    ImageLoad(PathBuf),

    /// The background image could not be decoded.
    BackgroundLoad(PathBuf),

    /// The font could not be opened.
    FontLoad(PathBuf),

    /// Text was requested before any font was loaded.
    FontNotLoaded,

    /// The platform produced no surface for this text.
    TextRender(String),

    /// An object registered as animated carries no animation.
    NotAnimated,

    /// Platform failure (buffer swap after shutdown, ...).
    Platform(PlatformError),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ImageLoad(path) => write!(f, "Could not load image {}", path.display()),
            Self::BackgroundLoad(path) => {
                write!(f, "Could not load background {}", path.display())
            }
            Self::FontLoad(path) => write!(f, "Could not load font {}", path.display()),
            Self::FontNotLoaded => write!(f, "No font loaded"),
            Self::TextRender(text) => write!(f, "Could not render text {:?}", text),
            Self::NotAnimated => write!(f, "Object has no animation"),
            Self::Platform(e) => write!(f, "Platform error: {}", e),
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Platform(e) => Some(e),
            _ => None,
        }
    }
}

impl From<PlatformError> for EngineError {
    fn from(e: PlatformError) -> Self {
        Self::Platform(e)
    }
}

//=== EngineConfig ========================================================

/// Engine settings fixed by [`EngineBuilder`].
///
/// Display size and color depth never change after `build`. Text color,
/// margin handling and title start from these values and can be changed
/// on the running engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub width: u32,
    pub height: u32,
    pub color_depth: u8,
    pub title: String,
    pub text_color: Color,
    pub margin_color: Color,
    pub clear_margins: bool,
    pub quit_policy: QuitPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            color_depth: 32,
            title: String::from("spritestage"),
            text_color: Color::WHITE,
            margin_color: Color::BLACK,
            clear_margins: true,
            quit_policy: QuitPolicy::ExitProcess,
        }
    }
}

//=== EngineBuilder =======================================================

/// Builder for configuring and constructing a [`GraphicsEngine`].
///
/// # Default Values
///
/// - **Display**: 640 × 480 at 32 bpp
/// - **Text color**: white
/// - **Margin fill**: enabled, black
/// - **Quit policy**: [`QuitPolicy::ExitProcess`]
///
/// # Examples
///
/// ```no_run
/// use spritestage::{EngineBuilder, QuitPolicy};
///
/// let (mut engine, _events) = EngineBuilder::new()
///     .with_size(800, 600)
///     .with_title("Invaders")
///     .with_quit_policy(QuitPolicy::ReturnToCaller)
///     .build_software();
///
/// engine.set_background("assets/sky.png").ok();
/// engine.run().unwrap();
/// ```
#[derive(Debug, Clone, Default)]
pub struct EngineBuilder {
    config: EngineConfig,
}

impl EngineBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the display size in pixels.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero.
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        assert!(
            width > 0 && height > 0,
            "Display size must be positive, got {}x{}",
            width,
            height
        );
        self.config.width = width;
        self.config.height = height;
        self
    }

    /// Sets the display color depth in bits per pixel.
    ///
    /// # Panics
    ///
    /// Panics unless `bpp` is 8, 16, 24 or 32.
    pub fn with_color_depth(mut self, bpp: u8) -> Self {
        assert!(
            matches!(bpp, 8 | 16 | 24 | 32),
            "Unsupported color depth: {} bpp",
            bpp
        );
        self.config.color_depth = bpp;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.config.title = title.into();
        self
    }

    /// Sets the initial color used by [`GraphicsEngine::add_text`].
    pub fn with_text_color(mut self, color: Color) -> Self {
        self.config.text_color = color;
        self
    }

    /// Sets the color used to fill margins around a small background.
    pub fn with_margin_color(mut self, color: Color) -> Self {
        self.config.margin_color = color;
        self
    }

    pub fn with_clear_margins(mut self, enabled: bool) -> Self {
        self.config.clear_margins = enabled;
        self
    }

    pub fn with_quit_policy(mut self, policy: QuitPolicy) -> Self {
        self.config.quit_policy = policy;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Builds the engine on top of an existing platform backend.
    pub fn build<P: Platform>(self, mut platform: P) -> GraphicsEngine<P> {
        let config = self.config;

        if platform.display_size() != (config.width, config.height) {
            warn!(
                target: "engine",
                "Platform display is {:?} but engine was configured for {}x{}",
                platform.display_size(),
                config.width,
                config.height
            );
        }

        platform.set_title(&config.title);

        info!(
            target: "engine",
            "Building engine ({}x{} @ {} bpp)",
            config.width,
            config.height,
            config.color_depth
        );

        GraphicsEngine {
            compositor: Compositor::new(config.clear_margins, config.margin_color),
            text_color: config.text_color,
            platform,
            config,
            scene: SceneRegistry::new(),
            widgets: WidgetRegistry::new(),
            input: InputDispatcher::new(),
            loop_timer: LoopTimer::new(),
            font_loaded: false,
            shut_down: false,
        }
    }

    /// Builds the engine on a [`SoftwarePlatform`] sized from this config.
    ///
    /// Returns the sender used to feed platform events into the engine.
    pub fn build_software(self) -> (GraphicsEngine<SoftwarePlatform>, Sender<PlatformEvent>) {
        let (platform, events) = SoftwarePlatform::new(
            self.config.width,
            self.config.height,
            self.config.color_depth,
        );
        (self.build(platform), events)
    }
}

//=== Phase Reports =======================================================

/// Result of the event phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventReport {
    pub control: TickControl,
    /// Key events delivered to the keyboard listener.
    pub dispatched: usize,
    /// Key events dropped because no keyboard listener was set.
    pub dropped: usize,
    pub elapsed: Duration,
}

/// Result of the update phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateReport {
    pub objects_updated: usize,
    pub animations_advanced: usize,
    pub widgets_refreshed: usize,
    pub elapsed: Duration,
}

/// Result of the composite phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshReport {
    pub composite: CompositeReport,
    /// Drawing time, excluding the buffer swap.
    pub elapsed: Duration,
}

/// Result of one full loop iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameReport {
    pub control: TickControl,
    pub timings: FrameTimings,
    /// `None` when the frame ended in the event phase.
    pub composite: Option<CompositeReport>,
    /// Upper-bound FPS estimate for this iteration.
    pub max_fps: Option<u32>,
}

//=== GraphicsEngine ======================================================

/// Sprite engine runtime.
///
/// Owns the platform backend, the scene and widget registries, the input
/// listeners and the background. Create via [`EngineBuilder`].
///
/// # Frame Pipeline
///
/// ```text
/// Idle → check_events → update_game → refresh_screen → Idle
///          │               │              ├─ background + margins
///          │               │              ├─ scene objects
///          │               │              ├─ widgets
///          │               │              └─ present
///          │               └─ movement, animation advance, widget surfaces
///          └─ drain queue, dispatch keys, handle quit
/// ```
pub struct GraphicsEngine<P: Platform> {
    platform: P,
    config: EngineConfig,
    scene: SceneRegistry,
    widgets: WidgetRegistry,
    input: InputDispatcher,
    compositor: Compositor,
    loop_timer: LoopTimer,
    text_color: Color,
    font_loaded: bool,
    shut_down: bool,
}

impl<P: Platform> GraphicsEngine<P> {
    //--- Listeners --------------------------------------------------------

    /// Sets the keyboard listener. Key events are dropped while none is set.
    pub fn set_keyboard_listener<L>(&mut self, listener: L)
    where
        L: KeyboardListener + 'static,
    {
        self.input.set_keyboard_listener(Box::new(listener));
    }

    /// Sets the mouse listener.
    ///
    /// The pipeline does not route mouse events yet; the listener is kept
    /// for backends that add mouse support.
    pub fn set_mouse_listener<L>(&mut self, listener: L)
    where
        L: MouseListener + 'static,
    {
        self.input.set_mouse_listener(Box::new(listener));
    }

    pub fn input(&self) -> &InputDispatcher {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut InputDispatcher {
        &mut self.input
    }

    //--- Phase 1: Events --------------------------------------------------

    /// Drains every pending platform event.
    ///
    /// Key events go to the keyboard listener. Without a listener they are
    /// dropped one by one and draining continues, so a quit request later
    /// in the same batch is still seen.
    ///
    /// A quit request shuts the platform down and then either exits the
    /// process or returns [`TickControl::Exit`], per [`QuitPolicy`].
    pub fn check_events(&mut self) -> EventReport {
        let start = self.platform.ticks();
        let mut control = TickControl::Continue;
        let mut dispatched = 0;
        let mut dropped = 0;

        while let Some(event) = self.platform.poll_event() {
            match event {
                PlatformEvent::KeyDown(key) => {
                    self.route_key(&key, KeyPhase::Pressed, &mut dispatched, &mut dropped)
                }
                PlatformEvent::KeyUp(key) => {
                    self.route_key(&key, KeyPhase::Released, &mut dispatched, &mut dropped)
                }
                PlatformEvent::Quit => {
                    info!(target: "engine", "Quit event received, shutting down platform");
                    self.shutdown();

                    match self.config.quit_policy {
                        QuitPolicy::ExitProcess => std::process::exit(0),
                        QuitPolicy::ReturnToCaller => {
                            control = TickControl::Exit;
                            break;
                        }
                    }
                }
                PlatformEvent::Other => {}
            }
        }

        let elapsed = self.platform.ticks().saturating_sub(start);
        trace!(target: "engine", "Event phase: {:?} ({} dispatched)", elapsed, dispatched);

        EventReport {
            control,
            dispatched,
            dropped,
            elapsed,
        }
    }

    fn route_key(&mut self, key: &Key, phase: KeyPhase, dispatched: &mut usize, dropped: &mut usize) {
        if self.input.dispatch_key(key, phase) {
            *dispatched += 1;
        } else {
            *dropped += 1;
        }
    }

    //--- Phase 2: Update --------------------------------------------------

    /// Moves every registered object, advances animations and refreshes
    /// widget surfaces.
    ///
    /// Animations advance one frame per registration per call whether or
    /// not they are running; `Animation::is_running` is a flag for game
    /// code, not for the pipeline.
    pub fn update_game(&mut self) -> UpdateReport {
        let start = self.platform.ticks();
        let mut objects_updated = 0;
        let mut animations_advanced = 0;

        for (handle, entry) in self.scene.iter() {
            let mut object = entry.object().borrow_mut();
            object.update_movement();
            objects_updated += 1;

            if let Some(animation) = object.animation_mut() {
                match animation.advance() {
                    Ok(_) => animations_advanced += 1,
                    Err(e) => trace!(target: "engine", "Object {:?}: {}", handle, e),
                }
            }
        }

        let platform: &mut dyn Platform = &mut self.platform;
        let mut widgets_refreshed = 0;
        for (_, widget) in self.widgets.iter() {
            widget.borrow_mut().update_surface(platform);
            widgets_refreshed += 1;
        }

        let elapsed = self.platform.ticks().saturating_sub(start);
        trace!(target: "engine", "Update phase: {:?} ({} objects)", elapsed, objects_updated);

        UpdateReport {
            objects_updated,
            animations_advanced,
            widgets_refreshed,
            elapsed,
        }
    }

    //--- Phase 3: Composite + Swap ----------------------------------------

    /// Draws the frame and swaps it to the display.
    ///
    /// An empty scene is not an error: the report's status says
    /// `NothingToDraw` and background, margins and widgets are still shown.
    pub fn refresh_screen(&mut self) -> Result<RefreshReport, EngineError> {
        let start = self.platform.ticks();
        let composite = self
            .compositor
            .composite(&mut self.platform, &self.scene, &self.widgets);
        let elapsed = self.platform.ticks().saturating_sub(start);

        self.platform.present()?;

        trace!(target: "engine", "Composite phase: {:?} ({:?})", elapsed, composite.status);
        Ok(RefreshReport { composite, elapsed })
    }

    //--- Full Loop --------------------------------------------------------

    /// Runs one loop iteration: events, update, composite, swap.
    ///
    /// Stops after the event phase when a quit was handled.
    pub fn run_frame(&mut self) -> Result<FrameReport, EngineError> {
        self.game_loop_start();

        let events = self.check_events();
        if events.control == TickControl::Exit {
            return Ok(FrameReport {
                control: TickControl::Exit,
                timings: FrameTimings {
                    events: events.elapsed,
                    ..FrameTimings::default()
                },
                composite: None,
                max_fps: None,
            });
        }

        let update = self.update_game();
        let refresh = self.refresh_screen()?;
        self.game_loop_end();

        Ok(FrameReport {
            control: TickControl::Continue,
            timings: FrameTimings {
                events: events.elapsed,
                update: update.elapsed,
                composite: refresh.elapsed,
            },
            composite: Some(refresh.composite),
            max_fps: self.max_fps(),
        })
    }

    /// Runs frames back to back until a quit request is handled.
    pub fn run(&mut self) -> Result<(), EngineError> {
        info!(target: "engine", "Entering game loop");
        loop {
            if self.run_frame()?.control == TickControl::Exit {
                info!(target: "engine", "Game loop finished");
                return Ok(());
            }
        }
    }

    //--- Loop Instrumentation ---------------------------------------------

    /// Marks the start of a loop iteration.
    pub fn game_loop_start(&mut self) {
        self.loop_timer.start(self.platform.ticks());
    }

    /// Marks the end of a loop iteration.
    pub fn game_loop_end(&mut self) {
        self.loop_timer.end(self.platform.ticks());
    }

    /// Maximum achievable FPS for the last bracketed iteration.
    ///
    /// `None` when the iteration took under a millisecond or
    /// `game_loop_start`/`game_loop_end` were not both called.
    pub fn max_fps(&self) -> Option<u32> {
        self.loop_timer.max_fps()
    }

    //--- Scene Objects ----------------------------------------------------

    /// Registers a game object, preparing its surface by kind.
    ///
    /// - static: decodes the object's image path
    /// - animated: binds the animation's frame sequence
    /// - text: renders the text with the current font and text color
    pub fn add_game_object(&mut self, object: SharedObject) -> Result<ObjectHandle, EngineError> {
        enum Prepare {
            Animated,
            Image(PathBuf),
            Text(String),
        }

        let prepare = match object.borrow().kind() {
            ObjectKind::Animated(_) => Prepare::Animated,
            ObjectKind::Static { image } => Prepare::Image(image.clone()),
            ObjectKind::Text { text } => Prepare::Text(text.clone()),
        };

        match prepare {
            Prepare::Animated => self.scene.add_animated(object).ok_or(EngineError::NotAnimated),
            Prepare::Image(path) => {
                let surface = self
                    .platform
                    .load_image(&path)
                    .ok_or(EngineError::ImageLoad(path))?;
                Ok(self.scene.add_static(object, surface))
            }
            Prepare::Text(text) => {
                let surface = self.render_text(&text)?;
                Ok(self.scene.add_static(object, surface))
            }
        }
    }

    /// Decodes an animation's frames through this engine's platform.
    pub fn load_animation<S: AsRef<Path>>(&mut self, paths: &[S]) -> Animation {
        Animation::load(&mut self.platform, paths)
    }

    /// Registers an object with a caller-supplied surface.
    pub fn add_game_object_with_surface(
        &mut self,
        object: SharedObject,
        surface: Surface,
    ) -> ObjectHandle {
        self.scene.add_static(object, surface)
    }

    /// Renders `text` at `(x, y)` and registers it as a text object.
    pub fn add_text(&mut self, text: &str, x: i32, y: i32) -> Result<ObjectHandle, EngineError> {
        let surface = self.render_text(text)?;
        let object = SceneObject::new_text(x, y, text).into_shared();
        Ok(self.scene.add_static(object, surface))
    }

    pub fn remove_game_object(&mut self, handle: ObjectHandle) -> bool {
        self.scene.remove(handle)
    }

    /// Removes the object at draw-order `position`.
    pub fn remove_game_object_at(&mut self, position: usize) -> bool {
        self.scene.remove_at(position)
    }

    /// Removes every registration of `object`.
    pub fn remove_object(&mut self, object: &SharedObject) -> usize {
        self.scene.remove_object(object)
    }

    pub fn clear_game_objects(&mut self) {
        self.scene.clear();
    }

    pub fn scene(&self) -> &SceneRegistry {
        &self.scene
    }

    //--- Widgets ----------------------------------------------------------

    pub fn add_widget(&mut self, widget: SharedWidget) -> WidgetHandle {
        self.widgets.add(widget)
    }

    pub fn remove_widget(&mut self, handle: WidgetHandle) -> bool {
        self.widgets.remove(handle)
    }

    pub fn remove_widget_at(&mut self, position: usize) -> bool {
        self.widgets.remove_at(position)
    }

    /// Removes every registration of `widget`.
    pub fn remove_widget_object(&mut self, widget: &SharedWidget) -> usize {
        self.widgets.remove_widget(widget)
    }

    pub fn widgets(&self) -> &WidgetRegistry {
        &self.widgets
    }

    //--- Background -------------------------------------------------------

    /// Loads a new background and recomputes the margin regions against
    /// the platform's actual display size.
    ///
    /// On failure the previous background is dropped and nothing is
    /// drawn behind the scene until a background loads successfully.
    pub fn set_background(&mut self, path: impl AsRef<Path>) -> Result<(), EngineError> {
        let path = path.as_ref();

        let Some(surface) = self.platform.load_image(path) else {
            warn!(target: "engine", "Background {:?} could not be loaded", path);
            self.compositor.set_background(None);
            return Err(EngineError::BackgroundLoad(path.to_path_buf()));
        };

        let background = Background::new(surface, self.platform.display_size());
        info!(
            target: "engine",
            "Background set to {:?} ({} margin regions)",
            path,
            background.margins().regions().count()
        );
        self.compositor.set_background(Some(background));
        Ok(())
    }

    pub fn background(&self) -> Option<&Background> {
        self.compositor.background()
    }

    /// Enables or disables filling the display area the background misses.
    pub fn set_clear_margins(&mut self, enabled: bool) {
        self.compositor.set_clear_margins(enabled);
    }

    pub fn set_margin_color(&mut self, color: Color) {
        self.compositor.set_margin_color(color);
    }

    //--- Text -------------------------------------------------------------

    pub fn set_text_font(&mut self, path: impl AsRef<Path>, size: f32) -> Result<(), EngineError> {
        let path = path.as_ref();
        self.font_loaded = self.platform.load_font(path, size);

        if self.font_loaded {
            debug!(target: "engine", "Font {:?} loaded at {}px", path, size);
            Ok(())
        } else {
            Err(EngineError::FontLoad(path.to_path_buf()))
        }
    }

    pub fn set_text_color(&mut self, color: Color) {
        self.text_color = color;
    }

    pub fn text_color(&self) -> Color {
        self.text_color
    }

    fn render_text(&mut self, text: &str) -> Result<Surface, EngineError> {
        if !self.font_loaded {
            return Err(EngineError::FontNotLoaded);
        }
        self.platform
            .render_text(text, self.text_color)
            .ok_or_else(|| EngineError::TextRender(text.to_string()))
    }

    //--- Window -----------------------------------------------------------

    pub fn set_title(&mut self, title: &str) {
        self.platform.set_title(title);
    }

    /// Blocks for `duration`. Events are not processed meanwhile.
    pub fn delay_screen(&mut self, duration: Duration) {
        self.platform.delay(duration);
    }

    //--- Accessors --------------------------------------------------------

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn platform_mut(&mut self) -> &mut P {
        &mut self.platform
    }

    //--- Shutdown ---------------------------------------------------------

    /// Shuts the platform down. Later calls do nothing.
    pub fn shutdown(&mut self) {
        if self.shut_down {
            return;
        }
        self.platform.shutdown();
        self.shut_down = true;
        info!(target: "engine", "Platform shut down");
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down
    }
}

impl<P: Platform> Drop for GraphicsEngine<P> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
