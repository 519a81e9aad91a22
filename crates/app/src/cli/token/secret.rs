use scoops_app::auth::generate_token_secret;

pub(crate) fn run() {
    println!("TOKEN_SECRET={}", generate_token_secret());
}
