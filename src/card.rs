//! Browser side of the card: builds the DOM, wires click / resize listeners,
//! runs the celebration interval and the animation-frame loop.
//!
//! One card per page. The mounted instance owns every closure and timer
//! handle it registers, so `unmount` can detach and cancel all of them and no
//! late callback ever touches a torn-down card.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    CanvasRenderingContext2d, Document, EventTarget, HtmlButtonElement, HtmlCanvasElement,
    HtmlElement, Window, window,
};

use crate::anim;
use crate::confetti::ConfettiBurst;
use crate::config::CardConfig;
use crate::error::CardError;
use crate::state::{CardView, InteractionState};

pub const ROOT_ID: &str = "bc-root";
pub const CARD_ID: &str = "bc-card";
pub const CONFETTI_CANVAS_ID: &str = "bc-confetti";
pub const CELEBRATE_BUTTON_ID: &str = "bc-celebrate";

pub fn candle_id(index: u32) -> String {
    format!("bc-candle-{index}")
}

pub fn balloon_id(index: u32) -> String {
    format!("bc-balloon-{index}")
}

// Icons use currentColor so the palette can be applied through `style.color`.
const CAKE_SVG: &str = "<svg viewBox='0 0 24 24' width='32' height='32' fill='currentColor'><rect x='11' y='2' width='2' height='5' rx='1'/><rect x='4' y='9' width='16' height='5' rx='1'/><rect x='2' y='15' width='20' height='7' rx='1'/></svg>";
const BALLOON_SVG: &str = "<svg viewBox='0 0 24 24' width='32' height='32' fill='currentColor'><ellipse cx='12' cy='9' rx='7' ry='8'/><path d='M12 17l-2 3h4z'/><path d='M12 20v3' stroke='currentColor' fill='none'/></svg>";
const GIFT_SVG: &str = "<svg viewBox='0 0 24 24' width='16' height='16' fill='currentColor' style='margin-left:8px;vertical-align:-2px'><rect x='3' y='8' width='18' height='4'/><rect x='5' y='12' width='14' height='9'/><rect x='11' y='8' width='2' height='13' fill='#fff'/></svg>";

/// An event listener we registered and must remove again.
struct Listener {
    target: EventTarget,
    kind: &'static str,
    callback: Closure<dyn FnMut(web_sys::Event)>,
}

impl Listener {
    fn attach(
        target: &EventTarget,
        kind: &'static str,
        f: impl FnMut(web_sys::Event) + 'static,
    ) -> Result<Self, CardError> {
        let callback = Closure::wrap(Box::new(f) as Box<dyn FnMut(web_sys::Event)>);
        target.add_event_listener_with_callback(kind, callback.as_ref().unchecked_ref())?;
        Ok(Self {
            target: target.clone(),
            kind,
            callback,
        })
    }

    fn detach(&self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.kind, self.callback.as_ref().unchecked_ref());
    }
}

/// The celebration's repeating timer. The closure stays alive until teardown
/// even after the interval is cleared, since it may clear itself mid-call.
struct IntervalTask {
    id: Option<i32>,
    _callback: Closure<dyn FnMut()>,
}

impl IntervalTask {
    fn cancel(&mut self) {
        if let (Some(id), Some(w)) = (self.id.take(), window()) {
            w.clear_interval_with_handle(id);
        }
    }
}

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

struct FrameTask {
    callback: FrameCallback,
    handle: Rc<Cell<Option<i32>>>,
}

impl FrameTask {
    fn cancel(&self) {
        if let (Some(id), Some(w)) = (self.handle.take(), window()) {
            let _ = w.cancel_animation_frame(id);
        }
        // Breaks the closure's reference to itself.
        self.callback.borrow_mut().take();
    }
}

/// What the pointer is currently over.
#[derive(Default)]
struct Hover {
    card: bool,
    candle: Option<u32>,
    balloon: Option<u32>,
}

struct MountedCard {
    cfg: CardConfig,
    state: InteractionState,
    root: HtmlElement,
    card: HtmlElement,
    candles: Vec<HtmlElement>,
    balloons: Vec<HtmlElement>,
    button: HtmlButtonElement,
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    confetti: Option<ConfettiBurst>,
    confetti_bursts: u32,
    hover: Hover,
    mounted_at: f64,
    last_frame: Option<f64>,
    popped_at: Vec<Option<f64>>,
    celebration: Option<IntervalTask>,
    frame: Option<FrameTask>,
    listeners: Vec<Listener>,
}

thread_local! {
    static CARD: RefCell<Option<MountedCard>> = const { RefCell::new(None) };
}

fn now_ms() -> f64 {
    window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}

fn confetti_seed() -> u64 {
    #[cfg(feature = "rng")]
    {
        let mut buf = [0u8; 8];
        if getrandom::getrandom(&mut buf).is_ok() {
            return u64::from_le_bytes(buf);
        }
    }
    now_ms().to_bits()
}

fn window_size(win: &Window) -> (f64, f64) {
    let w = win.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    let h = win.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    (w, h)
}

fn with_card(f: impl FnOnce(&mut MountedCard)) {
    CARD.with(|cell| {
        if let Some(card) = cell.borrow_mut().as_mut() {
            f(card);
        }
    });
}

pub fn is_mounted() -> bool {
    CARD.with(|cell| cell.borrow().is_some())
}

/// Current render snapshot of the mounted card, if any.
pub fn snapshot() -> Option<CardView> {
    CARD.with(|cell| cell.borrow().as_ref().map(|c| c.state.view(&c.cfg)))
}

/// `(candles lit, balloons popped)` of the mounted card.
pub fn counters() -> Option<(u32, u32)> {
    CARD.with(|cell| {
        cell.borrow()
            .as_ref()
            .map(|c| (c.state.candles_lit(), c.state.balloons_popped()))
    })
}

/// How many confetti bursts the mounted card has started (0 or 1).
pub fn confetti_bursts() -> u32 {
    CARD.with(|cell| cell.borrow().as_ref().map_or(0, |c| c.confetti_bursts))
}

/// Whether the celebration interval is still scheduled.
pub fn celebration_timer_active() -> bool {
    CARD.with(|cell| {
        cell.borrow()
            .as_ref()
            .and_then(|c| c.celebration.as_ref())
            .is_some_and(|t| t.id.is_some())
    })
}

fn html(doc: &Document, tag: &str, style: &str) -> Result<HtmlElement, CardError> {
    let el: HtmlElement = doc
        .create_element(tag)?
        .dyn_into()
        .map_err(|_| CardError::Dom(format!("<{tag}> is not an HtmlElement")))?;
    el.set_attribute("style", style)?;
    Ok(el)
}

fn text(doc: &Document, tag: &str, style: &str, content: &str) -> Result<HtmlElement, CardError> {
    let el = html(doc, tag, style)?;
    el.set_text_content(Some(content));
    Ok(el)
}

/// Mount a fresh card. An already mounted card is torn down first, which is
/// the only way to reset the counters.
pub fn mount(cfg: CardConfig) -> Result<(), CardError> {
    cfg.validate()?;
    if unmount() {
        log::debug!("remounting card");
    }

    let win = window().ok_or(CardError::NoWindow)?;
    let doc = win.document().ok_or(CardError::NoDocument)?;
    let body = doc.body().ok_or(CardError::NoBody)?;

    let root = html(
        &doc,
        "div",
        "min-height:100vh; background:#fff; display:flex; align-items:center; justify-content:center; padding:16px; box-sizing:border-box; font-family:system-ui, sans-serif;",
    )?;
    root.set_id(ROOT_ID);

    let card = html(
        &doc,
        "div",
        "width:100%; max-width:28rem; border:4px solid #1f2937; border-radius:8px; box-shadow:0 10px 15px rgba(0,0,0,0.15); background:#f3f4f6; text-align:center; overflow:hidden; opacity:0; transform:scale(0.9); padding:24px 16px;",
    )?;
    card.set_id(CARD_ID);
    let title = text(&doc, "h2", "font-size:2.25rem; font-weight:700; color:#000; margin:0 0 4px;", &cfg.title)?;
    card.append_child(&title)?;
    let recipient = text(&doc, "p", "font-size:1.5rem; font-weight:600; color:#4b5563; margin:0 0 4px;", &cfg.recipient)?;
    card.append_child(&recipient)?;
    let date_line = text(&doc, "p", "font-size:1.125rem; color:#6b7280; margin:0 0 24px;", &cfg.date_line)?;
    card.append_child(&date_line)?;

    let row_style = "display:flex; justify-content:center; gap:8px; margin-bottom:24px;";
    let heading_style = "font-size:1.125rem; font-weight:600; color:#000; margin:0 0 8px;";
    let icon_style = "display:inline-block; width:32px; height:32px; cursor:pointer;";

    let candle_heading = text(&doc, "h3", heading_style, "Light the Candles:")?;
    card.append_child(&candle_heading)?;
    let candle_row = html(&doc, "div", row_style)?;
    let mut candles = Vec::with_capacity(cfg.total_candles as usize);
    for i in 0..cfg.total_candles {
        let el = html(&doc, "span", icon_style)?;
        el.set_id(&candle_id(i));
        el.set_inner_html(CAKE_SVG);
        candle_row.append_child(&el)?;
        candles.push(el);
    }
    card.append_child(&candle_row)?;

    let balloon_heading = text(&doc, "h3", heading_style, "Pop the Balloons:")?;
    card.append_child(&balloon_heading)?;
    let balloon_row = html(&doc, "div", row_style)?;
    let mut balloons = Vec::with_capacity(cfg.total_balloons as usize);
    for i in 0..cfg.total_balloons {
        let el = html(&doc, "span", icon_style)?;
        el.set_id(&balloon_id(i));
        el.set_inner_html(BALLOON_SVG);
        balloon_row.append_child(&el)?;
        balloons.push(el);
    }
    card.append_child(&balloon_row)?;

    let button: HtmlButtonElement = html(
        &doc,
        "button",
        "background:linear-gradient(to right, #ef4444, #fdba74); color:#fff; border:none; border-radius:9999px; padding:8px 20px; font-size:1rem; cursor:pointer;",
    )?
    .dyn_into()
    .map_err(|_| CardError::Dom("<button> is not an HtmlButtonElement".into()))?;
    button.set_id(CELEBRATE_BUTTON_ID);
    button.set_inner_html(&format!("Celebrate!{GIFT_SVG}"));
    card.append_child(&button)?;
    root.append_child(&card)?;
    body.append_child(&root)?;

    let canvas: HtmlCanvasElement = doc
        .create_element("canvas")?
        .dyn_into()
        .map_err(|_| CardError::Dom("<canvas> is not an HtmlCanvasElement".into()))?;
    canvas.set_id(CONFETTI_CANVAS_ID);
    canvas.set_attribute(
        "style",
        "position:fixed; left:0; top:0; pointer-events:none; z-index:50; display:none;",
    )?;
    body.append_child(&canvas)?;
    let ctx: CanvasRenderingContext2d = canvas
        .get_context("2d")?
        .ok_or(CardError::NoContext)?
        .dyn_into()
        .map_err(|_| CardError::NoContext)?;

    let mut state = InteractionState::from_config(&cfg);
    let (w, h) = window_size(&win);
    state.resize(w, h);
    canvas.set_width(w as u32);
    canvas.set_height(h as u32);

    let mut listeners = Vec::with_capacity(3 * (candles.len() + balloons.len()) + 4);
    for (i, el) in candles.iter().enumerate() {
        let index = i as u32;
        listeners.push(Listener::attach(el, "click", move |_| {
            with_card(|c| c.on_candle(index));
        })?);
    }
    for (i, el) in balloons.iter().enumerate() {
        let index = i as u32;
        listeners.push(Listener::attach(el, "click", move |_| {
            with_card(|c| c.on_balloon(index));
        })?);
    }
    listeners.push(Listener::attach(&card, "mouseenter", move |_| {
        with_card(|c| c.hover.card = true);
    })?);
    listeners.push(Listener::attach(&card, "mouseleave", move |_| {
        with_card(|c| c.hover.card = false);
    })?);
    for (i, el) in candles.iter().enumerate() {
        let index = i as u32;
        listeners.push(Listener::attach(el, "mouseenter", move |_| {
            with_card(|c| c.hover.candle = Some(index));
        })?);
        listeners.push(Listener::attach(el, "mouseleave", move |_| {
            with_card(|c| c.hover.candle = None);
        })?);
    }
    for (i, el) in balloons.iter().enumerate() {
        let index = i as u32;
        listeners.push(Listener::attach(el, "mouseenter", move |_| {
            with_card(|c| c.hover.balloon = Some(index));
        })?);
        listeners.push(Listener::attach(el, "mouseleave", move |_| {
            with_card(|c| c.hover.balloon = None);
        })?);
    }
    listeners.push(Listener::attach(&button, "click", move |_| {
        with_card(|c| c.on_celebrate());
    })?);
    listeners.push(Listener::attach(&win, "resize", move |_| {
        if let Some(w) = window() {
            let (width, height) = window_size(&w);
            with_card(|c| c.on_resize(width, height));
        }
    })?);

    log::info!(
        "card mounted: {} candles, {} balloons, viewport {}x{}",
        cfg.total_candles,
        cfg.total_balloons,
        w,
        h
    );

    let popped_at = vec![None; cfg.total_balloons as usize];
    let mounted = MountedCard {
        cfg,
        state,
        root,
        card,
        candles,
        balloons,
        button,
        canvas,
        ctx,
        confetti: None,
        confetti_bursts: 0,
        hover: Hover::default(),
        mounted_at: now_ms(),
        last_frame: None,
        popped_at,
        celebration: None,
        frame: None,
        listeners,
    };
    CARD.with(|cell| cell.replace(Some(mounted)));

    let frame = start_frame_loop();
    with_card(|c| c.frame = Some(frame));
    Ok(())
}

/// Tear the card down. Returns whether one was mounted.
pub fn unmount() -> bool {
    // Take it out first so no callback can borrow it while closures drop.
    let Some(card) = CARD.with(|cell| cell.borrow_mut().take()) else {
        return false;
    };
    card.teardown();
    log::info!("card unmounted");
    true
}

fn start_frame_loop() -> FrameTask {
    let f: FrameCallback = Rc::new(RefCell::new(None));
    let g = f.clone();
    let handle: Rc<Cell<Option<i32>>> = Rc::new(Cell::new(None));
    let h = handle.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |ts: f64| {
        let mut alive = false;
        with_card(|c| {
            c.render(ts);
            alive = true;
        });
        if !alive {
            h.set(None);
            return;
        }
        if let (Some(w), Some(cb)) = (window(), f.borrow().as_ref()) {
            h.set(w.request_animation_frame(cb.as_ref().unchecked_ref()).ok());
        }
    }) as Box<dyn FnMut(f64)>));
    if let (Some(w), Some(cb)) = (window(), g.borrow().as_ref()) {
        handle.set(w.request_animation_frame(cb.as_ref().unchecked_ref()).ok());
    }
    FrameTask {
        callback: g,
        handle,
    }
}

impl MountedCard {
    fn on_candle(&mut self, index: u32) {
        let before = self.state.confetti_visible();
        if self.state.light_candle(index) {
            log::debug!("candle {index} lit ({}/{})", self.state.candles_lit(), self.state.total_candles());
            self.after_change(before);
        }
    }

    fn on_balloon(&mut self, index: u32) {
        let before = self.state.confetti_visible();
        if self.state.pop_balloon(index) {
            if let Some(slot) = self.popped_at.get_mut(index as usize) {
                *slot = Some(now_ms());
            }
            log::debug!(
                "balloon {index} popped ({}/{})",
                self.state.balloons_popped(),
                self.state.total_balloons()
            );
            self.after_change(before);
        }
    }

    fn on_celebrate(&mut self) {
        let before = self.state.confetti_visible();
        if !self.state.celebrate() {
            return;
        }
        log::info!("celebration started");
        self.button.set_disabled(true);
        if self.state.celebration_pending() {
            self.start_celebration_timer();
        }
        self.after_change(before);
    }

    fn start_celebration_timer(&mut self) {
        let Some(win) = window() else { return };
        let callback = Closure::wrap(Box::new(move || {
            with_card(|c| c.on_celebration_tick());
        }) as Box<dyn FnMut()>);
        let id = win
            .set_interval_with_callback_and_timeout_and_arguments_0(
                callback.as_ref().unchecked_ref(),
                self.cfg.celebration_interval_ms,
            )
            .ok();
        if id.is_none() {
            log::warn!("could not schedule celebration timer");
        }
        self.celebration = Some(IntervalTask {
            id,
            _callback: callback,
        });
    }

    fn on_celebration_tick(&mut self) {
        let before = self.state.confetti_visible();
        let more = self.state.celebration_tick();
        if !more {
            if let Some(task) = self.celebration.as_mut() {
                task.cancel();
            }
            log::debug!("celebration timer finished");
        }
        self.after_change(before);
    }

    fn on_resize(&mut self, width: f64, height: f64) {
        self.state.resize(width, height);
        self.canvas.set_width(width as u32);
        self.canvas.set_height(height as u32);
        if let Some(burst) = self.confetti.as_mut() {
            burst.resize(width, height);
        }
    }

    /// Starts the confetti the first time it becomes visible.
    fn after_change(&mut self, confetti_before: bool) {
        if !confetti_before && self.state.confetti_visible() && self.confetti.is_none() {
            let vp = self.state.viewport();
            log::info!("confetti: {} pieces", self.cfg.confetti_pieces);
            self.confetti = Some(ConfettiBurst::new(
                vp.width,
                vp.height,
                self.cfg.confetti_pieces,
                self.cfg.confetti_colors.clone(),
                confetti_seed(),
            ));
            self.confetti_bursts += 1;
            let _ = self.canvas.style().set_property("display", "block");
        }
    }

    fn render(&mut self, ts: f64) {
        let dt = self.last_frame.map(|last| ts - last).unwrap_or(0.0);
        self.last_frame = Some(ts);

        let (scale, opacity) = anim::card_intro(ts - self.mounted_at);
        let scale = scale * anim::hover_scale(self.hover.card, anim::CARD_HOVER_SCALE);
        let style = self.card.style();
        let _ = style.set_property("transform", &format!("scale({scale})"));
        let _ = style.set_property("opacity", &opacity.to_string());
        let shadow = if self.hover.card {
            "0 25px 50px rgba(0,0,0,0.25)"
        } else {
            "0 10px 15px rgba(0,0,0,0.15)"
        };
        let _ = style.set_property("box-shadow", shadow);

        let view = self.state.view(&self.cfg);
        let bob = anim::candle_bob(ts - self.mounted_at);
        for (i, (el, item)) in self.candles.iter().zip(&view.candles).enumerate() {
            let style = el.style();
            let _ = style.set_property("color", &item.color);
            let y = if item.active { bob } else { 0.0 };
            let hover = anim::hover_scale(self.hover.candle == Some(i as u32), anim::ICON_HOVER_SCALE);
            let _ = style.set_property("transform", &format!("translateY({y}px) scale({hover})"));
        }
        let balloons = self.balloons.iter().zip(&view.balloons).zip(&self.popped_at);
        for (i, ((el, item), popped_at)) in balloons.enumerate() {
            let style = el.style();
            let _ = style.set_property("color", &item.color);
            let hover = anim::hover_scale(self.hover.balloon == Some(i as u32), anim::ICON_HOVER_SCALE);
            let scale = anim::balloon_scale(popped_at.map(|t| ts - t)) * hover;
            let _ = style.set_property("transform", &format!("scale({scale})"));
        }
        self.button.set_disabled(!view.celebrate_enabled);

        if let Some(burst) = self.confetti.as_mut() {
            if !burst.is_finished() {
                burst.step(dt);
                burst.draw(&self.ctx);
                if burst.is_finished() {
                    let _ = self.canvas.style().set_property("display", "none");
                    log::debug!("confetti finished");
                }
            }
        }
    }

    fn teardown(self) {
        if let Some(mut task) = self.celebration {
            task.cancel();
        }
        if let Some(frame) = &self.frame {
            frame.cancel();
        }
        for l in &self.listeners {
            l.detach();
        }
        self.root.remove();
        self.canvas.remove();
    }
}
