#![no_main]

use arbitrary::Unstructured;

use libfuzzer_sys::fuzz_target;
use skyline::contour::check_contour;

fn check(mut u: Unstructured) -> Result<(), arbitrary::Error> {
    let buildings = skyline::arbitrary::buildings(&mut u)?;
    let points = skyline::solve(&buildings).unwrap();
    check_contour(&points).unwrap();

    let triples: Vec<_> = buildings.iter().map(|b| (b.x1, b.x2, b.height)).collect();
    let tuples: Vec<_> = points.iter().map(|p| (p.x, p.y)).collect();
    assert_eq!(tuples, skyline_util::naive_skyline(&triples));
    Ok(())
}

fuzz_target!(|data: &[u8]| {
    let u = Unstructured::new(data);
    let _ = check(u);
});
