use web_sys::{HtmlElement, HtmlInputElement, KeyboardEvent};
use yew::prelude::*;

use super::MessageRow;
use crate::model::ChatMessage;

#[derive(Properties, PartialEq, Clone)]
pub struct ChatPanelProps {
    pub messages: Vec<ChatMessage>,
    /// True while a guide request is outstanding; the input row locks.
    pub pending: bool,
    pub on_send: Callback<String>,
}

fn submit(input_ref: &NodeRef, on_send: &Callback<String>) {
    let Some(input) = input_ref.cast::<HtmlInputElement>() else {
        return;
    };
    let raw = input.value();
    let text = raw.trim();
    if text.is_empty() {
        return;
    }
    on_send.emit(text.to_string());
    input.set_value("");
}

#[function_component(ChatPanel)]
pub fn chat_panel(props: &ChatPanelProps) -> Html {
    let input_ref = use_node_ref();
    let list_ref = use_node_ref();

    // Effect: pin the transcript to the bottom whenever it grows
    {
        let list_ref = list_ref.clone();
        use_effect_with((props.messages.len(), props.pending), move |_| {
            if let Some(list) = list_ref.cast::<HtmlElement>() {
                list.set_scroll_top(list.scroll_height().into());
            }
            || ()
        });
    }

    let on_click_send = {
        let input_ref = input_ref.clone();
        let on_send = props.on_send.clone();
        Callback::from(move |_| submit(&input_ref, &on_send))
    };
    let on_keydown = {
        let input_ref = input_ref.clone();
        let on_send = props.on_send.clone();
        Callback::from(move |e: KeyboardEvent| {
            if e.key() == "Enter" {
                submit(&input_ref, &on_send);
            }
        })
    };

    html! {<div style="display:flex; flex-direction:column; height:100%; min-width:0;">
        <div ref={list_ref.clone()} style="flex:1; overflow-y:auto; padding:16px; display:flex; flex-direction:column; gap:10px;">
            { for props.messages.iter().map(|m| html! { <MessageRow message={m.clone()} /> }) }
            { if props.pending {
                html! {<div style="display:flex; justify-content:flex-start;">
                    <div style="background:#161b22; border:1px solid #30363d; color:#8b949e; border-radius:12px; padding:8px 12px; font-size:14px;">{"..."}</div>
                </div>}
            } else {
                html! {}
            } }
        </div>
        <div style="display:flex; gap:8px; padding:12px 16px; border-top:1px solid #30363d; background:#161b22;">
            <input
                ref={input_ref.clone()}
                disabled={props.pending}
                onkeydown={on_keydown}
                placeholder="Ask where something is on campus..."
                style="flex:1; min-width:0; background:#0e1116; border:1px solid #30363d; border-radius:8px; color:#e6edf3; padding:8px 12px; font-size:14px;"
            />
            <button
                onclick={on_click_send}
                disabled={props.pending}
                style="padding:8px 16px; background:#2ea043; border:1px solid #2ea043; border-radius:8px; color:#ffffff; font-size:14px; cursor:pointer;"
            >{"Send"}</button>
        </div>
    </div>}
}
