//! Print a freshly generated `JWT_SECRET` line for a `.env` file.

fn main() {
    println!("JWT_SECRET=\"{}\"", cinema_api::auth::jwt::generate_secret());
}
