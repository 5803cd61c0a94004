use std::sync::Mutex;

use log::{Level, LevelFilter, Log, Metadata, Record};

use densela::linalg::{solve, SingularValueDecomposition, SvdOptions};
use densela::Matrix;

/// Keeps every record so a test can assert on what the crate logged.
struct Capture {
    records: Mutex<Vec<(Level, String)>>,
}

impl Log for Capture {
    fn enabled(&self, _: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        if let Ok(mut records) = self.records.lock() {
            records.push((record.level(), record.args().to_string()));
        }
    }

    fn flush(&self) {}
}

static CAPTURE: Capture = Capture {
    records: Mutex::new(Vec::new()),
};

fn take() -> Vec<(Level, String)> {
    std::mem::take(&mut *CAPTURE.records.lock().unwrap())
}

// One test per binary: the logger is process-global.
#[test]
fn records_warnings_and_dispatch() {
    log::set_logger(&CAPTURE).unwrap();
    log::set_max_level(LevelFilter::Debug);

    let wide = Matrix::from_2d(&[[3.0, 0.0, 0.0], [0.0, 4.0, 0.0]]).unwrap();
    SingularValueDecomposition::new(&wide, SvdOptions::default()).unwrap();
    let records = take();
    assert!(
        records.iter().any(|(level, msg)| *level == Level::Warn
            && msg.contains("more columns than rows")),
        "no wide-input warning in {records:?}"
    );

    let opts = SvdOptions {
        auto_transpose: true,
        ..SvdOptions::default()
    };
    SingularValueDecomposition::new(&wide, opts).unwrap();
    let records = take();
    assert!(
        records.iter().all(|(level, _)| *level != Level::Warn),
        "unexpected warning in {records:?}"
    );

    let a = Matrix::from_2d(&[[2.0, 1.0], [1.0, 3.0]]).unwrap();
    let b = Matrix::column_vector(&[1.0, 2.0]);
    solve(&a, &b, false).unwrap();
    let records = take();
    assert!(
        records.iter().any(|(level, msg)| *level == Level::Debug && msg.contains("via LU")),
        "no dispatch record in {records:?}"
    );
}
