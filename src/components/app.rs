use std::rc::Rc;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use super::{AboutView, GuideView};
use crate::api;
use crate::geo::{GeoConfig, GeoError, PositionStream};
use crate::model::{
    Campus, ChatAction, ChatState, LocationCatalog, NavAction, NavState, PositionFix,
    CAMPUS_FALLBACK, CAMPUS_INFO_OFFLINE_NOTICE, CATALOG_OFFLINE_NOTICE,
};
use crate::util::{clog, now_label};

#[derive(PartialEq, Clone)]
enum View {
    Guide,
    About,
}

#[function_component(App)]
pub fn app() -> Html {
    let view = use_state(|| View::Guide);
    let nav = use_reducer(NavState::default);
    let chat = use_reducer(|| ChatState::seeded(&now_label()));
    let catalog = use_state(|| Rc::new(LocationCatalog::default()));
    let campus = use_state(|| None::<Campus>);
    // Synchronous re-entry guard for send; the reducer's pending flag
    // only becomes visible on the next render.
    let send_gate = use_mut_ref(|| false);

    // Effect: fetch the catalog and the college info once at startup
    {
        let catalog = catalog.clone();
        let campus = campus.clone();
        let chat = chat.clone();
        use_effect_with((), move |_| {
            {
                let catalog = catalog.clone();
                let chat = chat.clone();
                spawn_local(async move {
                    match api::fetch_locations().await {
                        Ok(rows) => {
                            clog(&format!("catalog loaded: {} locations", rows.len()));
                            catalog.set(Rc::new(LocationCatalog::new(rows)));
                        }
                        Err(err) => {
                            clog(&format!("locations fetch failed: {err}"));
                            chat.dispatch(ChatAction::Notice {
                                text: CATALOG_OFFLINE_NOTICE.to_string(),
                                at: now_label(),
                            });
                        }
                    }
                });
            }
            {
                let campus = campus.clone();
                let chat = chat.clone();
                spawn_local(async move {
                    match api::fetch_college().await {
                        Ok(info) => campus.set(Some(info)),
                        Err(err) => {
                            clog(&format!("college fetch failed: {err}"));
                            chat.dispatch(ChatAction::Notice {
                                text: CAMPUS_INFO_OFFLINE_NOTICE.to_string(),
                                at: now_label(),
                            });
                        }
                    }
                });
            }
            || ()
        });
    }

    // Effect: subscribe to device position for the lifetime of the app
    {
        let nav = nav.clone();
        use_effect_with((), move |_| {
            let on_fix = {
                let nav = nav.clone();
                Callback::from(move |fix: PositionFix| {
                    nav.dispatch(NavAction::PositionUpdate(fix));
                })
            };
            let on_error = Callback::from(move |err: GeoError| {
                clog(&format!("geolocation: {err}"));
            });
            let stream =
                PositionStream::start(GeoConfig::default(), CAMPUS_FALLBACK, on_fix, on_error)
                    .map_err(|err| clog(&format!("geolocation unavailable: {err:?}")))
                    .ok();
            move || drop(stream)
        });
    }

    // Send handler: append the user message, ask the guide, apply the
    // reply. At most one request is ever in flight.
    let send = {
        let chat = chat.clone();
        let nav = nav.clone();
        let send_gate = send_gate.clone();
        Callback::from(move |text: String| {
            if *send_gate.borrow() {
                return;
            }
            *send_gate.borrow_mut() = true;
            chat.dispatch(ChatAction::Submit {
                text: text.clone(),
                at: now_label(),
            });
            let chat = chat.clone();
            let nav = nav.clone();
            let send_gate = send_gate.clone();
            spawn_local(async move {
                match api::ask_guide(&text).await {
                    Ok(reply) => {
                        if let Some(target) = reply.location {
                            nav.dispatch(NavAction::SelectDestination {
                                id: target.id,
                                reveal: reply.show_map,
                            });
                        }
                        chat.dispatch(ChatAction::Reply {
                            text: reply.message,
                            at: now_label(),
                        });
                    }
                    Err(err) => {
                        clog(&format!("guide request failed: {err}"));
                        chat.dispatch(ChatAction::Failed { at: now_label() });
                    }
                }
                *send_gate.borrow_mut() = false;
            });
        })
    };

    let hide_map = {
        let nav = nav.clone();
        Callback::from(move |_: ()| nav.dispatch(NavAction::HideMap))
    };
    let to_guide: Callback<()> = {
        let view = view.clone();
        Callback::from(move |_| view.set(View::Guide))
    };

    let home = campus.as_ref().map(|c| c.center).unwrap_or(CAMPUS_FALLBACK);
    let title = campus
        .as_ref()
        .map(|c| c.name.clone())
        .unwrap_or_else(|| "Campus Guide".to_string());

    let tab_style = |active: bool| {
        if active {
            "padding:6px 12px; font-size:13px; background:#21262d; border:1px solid #58a6ff; border-radius:6px; color:#58a6ff; cursor:pointer;"
        } else {
            "padding:6px 12px; font-size:13px; background:#161b22; border:1px solid #30363d; border-radius:6px; color:#e6edf3; cursor:pointer;"
        }
    };

    let content = match *view {
        View::Guide => html! { <GuideView
            chat={chat.clone()}
            nav={nav.clone()}
            catalog={(*catalog).clone()}
            home={home}
            on_send={send.clone()}
            on_close_map={hide_map.clone()}
        /> },
        View::About => html! { <AboutView
            campus={(*campus).clone()}
            locations_count={catalog.len()}
            to_guide={to_guide.clone()}
        /> },
    };

    html! {<div style="display:flex; flex-direction:column; height:100vh; background:#0e1116; color:#e6edf3;">
        <div style="display:flex; justify-content:space-between; align-items:center; gap:12px; padding:10px 16px; border-bottom:1px solid #30363d; background:#161b22;">
            <div style="font-size:16px; font-weight:600; overflow:hidden; text-overflow:ellipsis; white-space:nowrap;">{ title }</div>
            <div style="display:flex; gap:8px; flex:0 0 auto;">
                <button
                    onclick={{ let view = view.clone(); Callback::from(move |_| view.set(View::Guide)) }}
                    style={tab_style(*view == View::Guide)}
                >{"Guide"}</button>
                <button
                    onclick={{ let view = view.clone(); Callback::from(move |_| view.set(View::About)) }}
                    style={tab_style(*view == View::About)}
                >{"About"}</button>
            </div>
        </div>
        { content }
    </div>}
}
