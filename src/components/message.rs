use crate::model::{Author, ChatMessage};
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct MessageRowProps {
    pub message: ChatMessage,
}

#[function_component(MessageRow)]
pub fn message_row(props: &MessageRowProps) -> Html {
    let from_user = props.message.author == Author::User;
    let justify = if from_user { "flex-end" } else { "flex-start" };
    let bubble = if from_user {
        "background:#1f6feb; border:1px solid #1f6feb; color:#ffffff;"
    } else {
        "background:#161b22; border:1px solid #30363d; color:#e6edf3;"
    };
    html! {<div style={format!("display:flex; justify-content:{};", justify)}>
        <div style={format!("max-width:75%; padding:8px 12px; border-radius:12px; font-size:14px; line-height:1.45; white-space:pre-wrap; overflow-wrap:anywhere; {}", bubble)}>
            <div>{ props.message.text.clone() }</div>
            <div style="font-size:10px; opacity:0.6; margin-top:4px; text-align:right;">{ props.message.at.clone() }</div>
        </div>
    </div>}
}
