pub trait Verify {
    fn verify(&self) -> eyre::Result<()>;
}

#[cfg(test)]
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}
