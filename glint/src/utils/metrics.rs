#[cfg(feature = "metrics")]
pub fn measure<T>(label: &str, f: impl FnOnce() -> T) -> T {
    use std::time::Instant;

    let tt = Instant::now();
    let val = f();
    let tt = tt.elapsed();

    log::debug!("{label}: {}", humantime::format_duration(tt));

    val
}

#[cfg(not(feature = "metrics"))]
pub fn measure<T>(_: &str, f: impl FnOnce() -> T) -> T {
    f()
}
