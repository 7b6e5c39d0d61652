mod api;
mod components;
mod geo;
mod map;
mod model;
mod util;

use components::App;

fn main() {
    console_error_panic_hook::set_once();
    yew::Renderer::<App>::new().render();
}
