use libtest_mimic::{Arguments, Failed, Trial};
use serde::{Deserialize, Serialize};
use skyline::{contour::check_contour, Building, Error};
use std::path::{Path, PathBuf};

#[derive(Serialize, Deserialize, Debug)]
enum Assertion {
    /// Solving succeeds and the result is a valid contour.
    NoPanic,
    /// Solving produces exactly these points.
    Skyline(Vec<(i64, i64)>),
    /// Solving rejects the building at this index.
    Rejected(usize),
}

#[derive(Serialize, Deserialize, Debug)]
struct RegressionCaseDeclaration {
    buildings: Vec<(i64, i64, i64)>,
    assert: Option<Assertion>,
}

fn main() {
    let args = Arguments::from_args();
    let tests = regression_tests();

    libtest_mimic::run(&args, tests).exit();
}

fn regression_tests() -> Vec<Trial> {
    let ws = std::env::var("CARGO_MANIFEST_DIR").unwrap();
    let file_paths = glob::glob(&format!("{ws}/tests/regression/**/*.yml")).unwrap();

    file_paths
        .into_iter()
        .map(|p| {
            let p = p.unwrap();
            let name = input_path_base(&p).display().to_string();
            Trial::test(name, || generate_regression_test(p))
        })
        .collect()
}

fn input_path_base(input_path: &Path) -> &Path {
    let ws = std::env::var("CARGO_MANIFEST_DIR").unwrap();
    let base = format!("{ws}/tests/regression");
    input_path.strip_prefix(base).unwrap()
}

fn generate_regression_test(path: PathBuf) -> Result<(), Failed> {
    let input = std::fs::read_to_string(&path).unwrap();
    let case: RegressionCaseDeclaration = serde_yaml::from_str(&input).unwrap();
    let buildings: Vec<Building> = case.buildings.iter().copied().map(Building::from).collect();

    match case.assert.unwrap_or(Assertion::NoPanic) {
        Assertion::NoPanic => {
            let points = skyline::solve(&buildings)?;
            check_contour(&points)?;
            assert_matches_naive(&case.buildings, &points)?;
        }
        Assertion::Skyline(expected) => {
            let points = skyline::solve(&buildings)?;
            check_contour(&points)?;
            let actual: Vec<_> = points.iter().map(|p| (p.x, p.y)).collect();
            if actual != expected {
                return Err(format!("expected {expected:?}, got {actual:?}").into());
            }
            assert_matches_naive(&case.buildings, &points)?;

            let mut reversed = buildings.clone();
            reversed.reverse();
            if skyline::solve(&reversed)? != points {
                return Err("skyline depends on input order".into());
            }
        }
        Assertion::Rejected(expected) => match skyline::solve(&buildings) {
            Err(Error::InvertedSpan { index, .. } | Error::NegativeHeight { index, .. })
                if index == expected => {}
            other => return Err(format!("expected rejection at {expected}, got {other:?}").into()),
        },
    }

    Ok(())
}

fn assert_matches_naive(
    triples: &[(i64, i64, i64)],
    points: &[skyline::Point],
) -> Result<(), Failed> {
    let actual: Vec<_> = points.iter().map(|p| (p.x, p.y)).collect();
    let naive = skyline_util::naive_skyline(triples);
    if actual != naive {
        return Err(format!("brute force gave {naive:?}, sweep gave {actual:?}").into());
    }
    Ok(())
}
