#[tokio::main]
async fn main() {
    if let Err(e) = clinic_scribe_lib::run().await {
        eprintln!("clinic-scribe: {e}");
        std::process::exit(1);
    }
}
