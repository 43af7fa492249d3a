#[tokio::main]
async fn main() {
    recipe_finder::start_server().await;
}
