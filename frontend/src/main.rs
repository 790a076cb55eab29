use frontend::App;

fn main() {
    yew::Renderer::<App>::new().render();
}
