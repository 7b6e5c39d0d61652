//! Map panel: owns the canvas surface for exactly as long as it is
//! mounted. Every repaint starts from a blank canvas and draws the
//! freshly composed [`Scene`], so overlays can never accumulate or go
//! stale between recomputes. Unmounting tears down the listeners and
//! the deferred resize timer along with the surface itself.

use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};
use yew::prelude::*;

use crate::map::viewport::graticule_step;
use crate::map::{Framing, Overlay, Projection, Scene};
use crate::model::{GeoPoint, LocationCatalog, NavState};

/// Delay before the one extra re-measure after mount. The flex layout
/// settles a beat after the panel reveals; without this the canvas
/// keeps its pre-reveal size until some unrelated window resize.
const SETTLE_DELAY_MS: i32 = 150;

#[derive(Properties, PartialEq, Clone)]
pub struct MapViewProps {
    pub nav: UseReducerHandle<NavState>,
    pub catalog: Rc<LocationCatalog>,
    /// Campus center; backdrop anchor and default framing.
    pub home: GeoPoint,
    pub on_close: Callback<()>,
}

#[function_component(MapView)]
pub fn map_view(props: &MapViewProps) -> Html {
    let canvas_ref = use_node_ref();
    let scene_ref = use_mut_ref(|| None::<Scene>);
    let draw_ref = use_mut_ref(|| None::<Rc<dyn Fn()>>);

    // Effect: recompose the scene and repaint on any state transition
    {
        let scene_ref = scene_ref.clone();
        let draw_ref = draw_ref.clone();
        let nav = props.nav.clone();
        let catalog = props.catalog.clone();
        let home = props.home;
        use_effect_with(
            (props.nav.revision, props.catalog.len(), props.home),
            move |_| {
                *scene_ref.borrow_mut() = Scene::compose(&nav, &catalog, home);
                if let Some(f) = &*draw_ref.borrow() {
                    f();
                }
                || ()
            },
        );
    }

    // Mount effect: size the canvas, install the draw closure, listen
    // for resizes, schedule the settle re-measure
    {
        let canvas_ref = canvas_ref.clone();
        let scene_ref = scene_ref.clone();
        let draw_ref_setup = draw_ref.clone();
        use_effect_with((), move |_| {
            let window = web_sys::window().expect("window");
            let canvas: HtmlCanvasElement = canvas_ref.cast::<HtmlCanvasElement>().expect("canvas");
            let compute_and_apply_canvas_size = {
                let canvas = canvas.clone();
                move || {
                    if let Some(parent) = canvas.parent_element() {
                        let width = parent.client_width().max(0) as u32;
                        let height = parent.client_height().max(0) as u32;
                        if width > 0 && height > 0 {
                            canvas.set_width(width);
                            canvas.set_height(height);
                        }
                    }
                }
            };
            compute_and_apply_canvas_size();
            // Draw closure
            let draw_closure: Rc<dyn Fn()> = {
                let canvas = canvas.clone();
                let scene_ref = scene_ref.clone();
                Rc::new(move || {
                    if !canvas.is_connected() {
                        return;
                    }
                    let ctx = match canvas.get_context("2d").ok().flatten() {
                        Some(c) => c.dyn_into::<CanvasRenderingContext2d>().unwrap(),
                        None => return,
                    };
                    let w = canvas.width() as f64;
                    let h = canvas.height() as f64;
                    paint(&ctx, w, h, scene_ref.borrow().as_ref());
                })
            };
            *draw_ref_setup.borrow_mut() = Some(draw_closure.clone());
            // Initial draw
            draw_closure();
            // Resize
            let resize_cb = {
                let compute_and_apply_canvas_size = compute_and_apply_canvas_size.clone();
                let draw = draw_closure.clone();
                Closure::wrap(Box::new(move |_e: web_sys::Event| {
                    compute_and_apply_canvas_size();
                    draw();
                }) as Box<dyn FnMut(_)>)
            };
            window
                .add_event_listener_with_callback("resize", resize_cb.as_ref().unchecked_ref())
                .ok();
            // Settle re-measure
            let settle_cb = {
                let compute_and_apply_canvas_size = compute_and_apply_canvas_size.clone();
                let draw = draw_closure.clone();
                Closure::wrap(Box::new(move || {
                    compute_and_apply_canvas_size();
                    draw();
                }) as Box<dyn FnMut()>)
            };
            let settle_id = window
                .set_timeout_with_callback_and_timeout_and_arguments_0(
                    settle_cb.as_ref().unchecked_ref(),
                    SETTLE_DELAY_MS,
                )
                .ok();
            // Cleanup
            let window_clone = window.clone();
            let draw_ref_cleanup = draw_ref_setup.clone();
            move || {
                let _ = window_clone.remove_event_listener_with_callback(
                    "resize",
                    resize_cb.as_ref().unchecked_ref(),
                );
                if let Some(id) = settle_id {
                    window_clone.clear_timeout_with_handle(id);
                }
                *draw_ref_cleanup.borrow_mut() = None;
                let _keep_alive = (&resize_cb, &settle_cb);
            }
        });
    }

    let destination = props
        .nav
        .selected_destination
        .as_ref()
        .and_then(|id| props.catalog.lookup(id))
        .cloned();
    let heading = destination
        .as_ref()
        .map(|d| d.name.clone())
        .unwrap_or_else(|| "Campus map".to_string());
    let locating = props.nav.user_position.is_none();
    let close_cb = {
        let cb = props.on_close.clone();
        Callback::from(move |_| cb.emit(()))
    };

    html! {<div style="display:flex; flex-direction:column; height:100%; min-width:0; background:#0e1116; border-left:1px solid #30363d;">
        <div style="display:flex; justify-content:space-between; align-items:center; gap:8px; padding:10px 14px; border-bottom:1px solid #30363d; background:#161b22;">
            <div style="min-width:0;">
                <div style="font-size:15px; font-weight:600; overflow:hidden; text-overflow:ellipsis; white-space:nowrap;">{ heading }</div>
                { match &destination {
                    Some(d) => html! {<div style="font-size:11px; opacity:0.7;">{ d.direction.clone() }</div>},
                    None => html! {},
                } }
            </div>
            <button onclick={close_cb} style="padding:4px 10px; font-size:12px; background:#21262d; border:1px solid #30363d; border-radius:6px; color:#e6edf3; cursor:pointer; flex:0 0 auto;">{"Close"}</button>
        </div>
        <div style="position:relative; flex:1; min-height:0;">
            <canvas ref={canvas_ref.clone()} style="display:block; width:100%; height:100%;"></canvas>
            { if locating {
                html! {<div style="position:absolute; left:12px; bottom:12px; background:rgba(22,27,34,0.9); border:1px solid #30363d; border-radius:8px; padding:6px 10px; font-size:12px; color:#8b949e;">{"Locating you..."}</div>}
            } else {
                html! {}
            } }
        </div>
    </div>}
}

// ---------------- Canvas painting -----------------

fn projection_for(scene: &Scene, w: f64, h: f64) -> Projection {
    match scene.framing {
        Framing::Centered { center, zoom } => Projection::centered(center, zoom, w, h),
        Framing::FitPair { a, b } => Projection::fit(a, b, w, h),
    }
}

fn paint(ctx: &CanvasRenderingContext2d, w: f64, h: f64, scene: Option<&Scene>) {
    ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0).ok();
    ctx.set_fill_style_str("#0e1116");
    ctx.fill_rect(0.0, 0.0, w, h);
    let Some(scene) = scene else { return };
    if w < 1.0 || h < 1.0 {
        return;
    }
    let proj = projection_for(scene, w, h);
    paint_backdrop(ctx, &proj, scene.home);
    for overlay in &scene.overlays {
        match overlay {
            Overlay::Path { from, to, label } => paint_path(ctx, &proj, *from, *to, label),
            Overlay::Destination {
                at,
                name,
                direction,
            } => paint_destination(ctx, &proj, *at, name, direction),
            Overlay::User { at } => paint_user(ctx, &proj, *at),
        }
    }
}

fn paint_backdrop(ctx: &CanvasRenderingContext2d, proj: &Projection, home: GeoPoint) {
    let w = proj.width();
    let h = proj.height();
    ctx.set_fill_style_str("#161b22");
    ctx.fill_rect(0.0, 0.0, w, h);
    // Graticule
    let step = graticule_step(proj.meters_per_pixel());
    let top_left = proj.to_geo(0.0, 0.0);
    let bottom_right = proj.to_geo(w, h);
    ctx.set_stroke_style_str("#2f3641");
    ctx.set_line_width(1.0);
    let mut lng = (top_left.lng / step).floor() * step;
    while lng <= bottom_right.lng {
        let (x, _) = proj.to_canvas(GeoPoint {
            lat: proj.center().lat,
            lng,
        });
        ctx.begin_path();
        ctx.move_to(x, 0.0);
        ctx.line_to(x, h);
        ctx.stroke();
        lng += step;
    }
    let mut lat = (bottom_right.lat / step).floor() * step;
    while lat <= top_left.lat {
        let (_, y) = proj.to_canvas(GeoPoint {
            lat,
            lng: proj.center().lng,
        });
        ctx.begin_path();
        ctx.move_to(0.0, y);
        ctx.line_to(w, y);
        ctx.stroke();
        lat += step;
    }
    // Campus ring anchors the view even when the framing is elsewhere
    let (cx, cy) = proj.to_canvas(home);
    let ring = (200.0 / proj.meters_per_pixel()).max(12.0);
    ctx.set_stroke_style_str("#30363d");
    ctx.set_line_width(2.0);
    ctx.begin_path();
    ctx.arc(cx, cy, ring, 0.0, std::f64::consts::TAU).ok();
    ctx.stroke();
}

fn paint_path(
    ctx: &CanvasRenderingContext2d,
    proj: &Projection,
    from: GeoPoint,
    to: GeoPoint,
    label: &str,
) {
    let (x1, y1) = proj.to_canvas(from);
    let (x2, y2) = proj.to_canvas(to);
    let dash = js_sys::Array::of2(&JsValue::from_f64(8.0), &JsValue::from_f64(6.0));
    ctx.set_line_dash(dash.as_ref()).ok();
    ctx.set_stroke_style_str("#58a6ff");
    ctx.set_line_width(2.5);
    ctx.begin_path();
    ctx.move_to(x1, y1);
    ctx.line_to(x2, y2);
    ctx.stroke();
    ctx.set_line_dash(js_sys::Array::new().as_ref()).ok();
    // Distance chip at the midpoint
    let mx = (x1 + x2) / 2.0;
    let my = (y1 + y2) / 2.0;
    ctx.set_font("12px sans-serif");
    let text_w = ctx.measure_text(label).map(|m| m.width()).unwrap_or(64.0);
    let chip_w = text_w + 12.0;
    let chip_h = 20.0;
    ctx.set_fill_style_str("rgba(22,27,34,0.9)");
    ctx.fill_rect(mx - chip_w / 2.0, my - chip_h / 2.0, chip_w, chip_h);
    ctx.set_stroke_style_str("#30363d");
    ctx.set_line_width(1.0);
    ctx.stroke_rect(mx - chip_w / 2.0, my - chip_h / 2.0, chip_w, chip_h);
    ctx.set_fill_style_str("#e6edf3");
    ctx.set_text_align("center");
    ctx.set_text_baseline("middle");
    ctx.fill_text(label, mx, my).ok();
}

fn paint_destination(
    ctx: &CanvasRenderingContext2d,
    proj: &Projection,
    at: GeoPoint,
    name: &str,
    direction: &str,
) {
    let (x, y) = proj.to_canvas(at);
    ctx.set_fill_style_str("#f0883e");
    ctx.begin_path();
    ctx.arc(x, y, 7.0, 0.0, std::f64::consts::TAU).ok();
    ctx.fill();
    ctx.set_stroke_style_str("#0e1116");
    ctx.set_line_width(2.0);
    ctx.begin_path();
    ctx.arc(x, y, 7.0, 0.0, std::f64::consts::TAU).ok();
    ctx.stroke();
    // Popup is always open; it carries the name and the direction hint
    ctx.set_font("600 13px sans-serif");
    let name_w = ctx.measure_text(name).map(|m| m.width()).unwrap_or(80.0);
    ctx.set_font("11px sans-serif");
    let dir_w = ctx
        .measure_text(direction)
        .map(|m| m.width())
        .unwrap_or(80.0);
    let box_w = name_w.max(dir_w) + 16.0;
    let box_h = 40.0;
    let bx = x - box_w / 2.0;
    let by = y - 14.0 - box_h;
    ctx.set_fill_style_str("rgba(22,27,34,0.95)");
    ctx.fill_rect(bx, by, box_w, box_h);
    ctx.set_stroke_style_str("#30363d");
    ctx.set_line_width(1.0);
    ctx.stroke_rect(bx, by, box_w, box_h);
    ctx.begin_path();
    ctx.move_to(x, by + box_h);
    ctx.line_to(x, y - 9.0);
    ctx.stroke();
    ctx.set_text_align("center");
    ctx.set_text_baseline("middle");
    ctx.set_fill_style_str("#e6edf3");
    ctx.set_font("600 13px sans-serif");
    ctx.fill_text(name, x, by + 13.0).ok();
    ctx.set_fill_style_str("#8b949e");
    ctx.set_font("11px sans-serif");
    ctx.fill_text(direction, x, by + 28.0).ok();
}

fn paint_user(ctx: &CanvasRenderingContext2d, proj: &Projection, at: GeoPoint) {
    let (x, y) = proj.to_canvas(at);
    ctx.set_fill_style_str("rgba(88,166,255,0.18)");
    ctx.begin_path();
    ctx.arc(x, y, 14.0, 0.0, std::f64::consts::TAU).ok();
    ctx.fill();
    ctx.set_fill_style_str("#58a6ff");
    ctx.begin_path();
    ctx.arc(x, y, 5.0, 0.0, std::f64::consts::TAU).ok();
    ctx.fill();
    ctx.set_stroke_style_str("#e6edf3");
    ctx.set_line_width(1.5);
    ctx.begin_path();
    ctx.arc(x, y, 5.0, 0.0, std::f64::consts::TAU).ok();
    ctx.stroke();
}
