use std::rc::Rc;
use yew::prelude::*;

use super::{ChatPanel, MapView};
use crate::model::{ChatState, GeoPoint, LocationCatalog, NavState};

#[derive(Properties, PartialEq, Clone)]
pub struct GuideViewProps {
    pub chat: UseReducerHandle<ChatState>,
    pub nav: UseReducerHandle<NavState>,
    pub catalog: Rc<LocationCatalog>,
    pub home: GeoPoint,
    pub on_send: Callback<String>,
    pub on_close_map: Callback<()>,
}

/// Chat on the left, map on the right. The map subtree exists only
/// while `map_visible` is set, so hiding it really does release the
/// canvas and everything attached to it.
#[function_component(GuideView)]
pub fn guide_view(props: &GuideViewProps) -> Html {
    let map_open = props.nav.map_visible;
    let chat_style = if map_open {
        "display:flex; flex-direction:column; flex:1; min-width:0;"
    } else {
        "display:flex; flex-direction:column; flex:1; min-width:0; max-width:860px; width:100%; margin:0 auto;"
    };
    html! {<div style="display:flex; flex:1; min-height:0;">
        <div style={chat_style}>
            <ChatPanel
                messages={props.chat.messages.clone()}
                pending={props.chat.pending}
                on_send={props.on_send.clone()}
            />
        </div>
        { if map_open {
            html! {<div style="flex:1; min-width:0;">
                <MapView
                    nav={props.nav.clone()}
                    catalog={props.catalog.clone()}
                    home={props.home}
                    on_close={props.on_close_map.clone()}
                />
            </div>}
        } else {
            html! {}
        } }
    </div>}
}
