use yew::prelude::*;

use crate::model::{Campus, CAMPUS_FALLBACK};

#[derive(Properties, PartialEq, Clone)]
pub struct AboutViewProps {
    /// None until the college info has loaded (or never, if it failed).
    pub campus: Option<Campus>,
    pub locations_count: usize,
    pub to_guide: Callback<()>,
}

#[function_component(AboutView)]
pub fn about_view(props: &AboutViewProps) -> Html {
    let back_cb = {
        let cb = props.to_guide.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let name = props
        .campus
        .as_ref()
        .map(|c| c.name.clone())
        .unwrap_or_else(|| "the campus".to_string());
    let center = props
        .campus
        .as_ref()
        .map(|c| c.center)
        .unwrap_or(CAMPUS_FALLBACK);
    let coverage = if props.locations_count == 0 {
        "The location catalog has not loaded, so map answers are unavailable right now.".to_string()
    } else {
        format!(
            "The guide currently knows {} places on campus.",
            props.locations_count
        )
    };

    html! {<div style="flex:1; overflow-y:auto; display:flex; justify-content:center; padding:32px 16px;">
        <div style="max-width:640px; width:100%; display:flex; flex-direction:column; gap:16px;">
            <h2 style="margin:0; font-size:22px;">{ format!("About {}", name) }</h2>
            <div style="background:#161b22; border:1px solid #30363d; border-radius:12px; padding:16px 20px; display:flex; flex-direction:column; gap:10px; font-size:14px; line-height:1.5;">
                <p style="margin:0;">{"Ask the guide where any building, gate or facility is. When it knows the place, it opens a map with the route from where you are standing, the walking distance and the direction to head."}</p>
                <p style="margin:0;">{ coverage }</p>
                <p style="margin:0; color:#8b949e; font-size:12px;">{ format!("Campus center: {:.4}, {:.4}", center.lat, center.lng) }</p>
            </div>
            <div>
                <button onclick={back_cb} style="padding:8px 16px; background:#2ea043; border:1px solid #2ea043; border-radius:8px; color:#ffffff; font-size:14px; cursor:pointer;">{"Back to the guide"}</button>
            </div>
        </div>
    </div>}
}
