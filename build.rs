fn main() {
    // Embedded migrations are read at compile time by `sqlx::migrate!()`
    println!("cargo:rerun-if-changed=migrations");
}
