#![cfg(feature = "html")]

use std::fs;
use std::path::PathBuf;

use mazecanvas::{Page, PageEvent, RenderConfig};

fn golden_path(name: &str) -> PathBuf {
    let mut p = PathBuf::from("tests/goldens/expected");
    p.push(name);
    p
}

#[test]
fn golden_maze_matches_fixture() {
    let html = fs::read_to_string("tests/goldens/pages/maze1.html").expect("read fixture");
    let mut page = Page::from_html(&html, RenderConfig::default()).expect("scan fixture");
    let report = page.dispatch(PageEvent::Load).expect("load renders");
    assert!(report.is_clean(), "fixture should render cleanly: {:?}", report);

    let raster = page.surface(&"maze1".into()).and_then(|s| s.canvas_context()).expect("canvas");
    assert_eq!((raster.width(), raster.height()), (256, 128));
    let digest = raster.digest();

    let expected_path = golden_path("maze1.digest");
    if std::env::var("UPDATE_GOLDENS").is_ok() {
        fs::create_dir_all("tests/goldens/expected").ok();
        fs::write(&expected_path, &digest).expect("write golden");
        println!("Updated golden: {:?}", expected_path);
        return;
    }

    if !expected_path.exists() {
        println!(
            "No golden at {:?}; run with UPDATE_GOLDENS=1 to create it. Skipping.",
            expected_path
        );
        return;
    }

    let exp = fs::read_to_string(&expected_path).expect("unable to read golden");
    assert_eq!(digest, exp.trim());
}

#[test]
fn golden_png_decodes_to_raster_pixels() {
    let html = fs::read_to_string("tests/goldens/pages/maze1.html").expect("read fixture");
    let mut page = Page::from_html(&html, RenderConfig::default()).expect("scan fixture");
    page.dispatch(PageEvent::Load);

    let raster = page.surface(&"maze1".into()).and_then(|s| s.canvas_context()).expect("canvas");
    let shot = raster.screenshot().expect("png");
    let decoded = image::load_from_memory(&shot.png_data).expect("decode").to_rgba8();
    assert_eq!(decoded.dimensions(), (256, 128));
    assert_eq!(decoded.as_raw().as_slice(), raster.pixels());
}
