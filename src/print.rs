use std::process::{Command, Stdio};

use anyhow::Context;
use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};

use crate::clipboard::encode_png;
use crate::error::ActionError;

const PAGE_COLOR: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// A print destination as reported by the system spooler
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintTarget {
    pub name: String,
}

/// Page canvas in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageGeometry {
    pub width: u32,
    pub height: u32,
}

impl Default for PageGeometry {
    /// A4 at 300 dpi
    fn default() -> Self {
        PageGeometry {
            width: 2480,
            height: 3508,
        }
    }
}

/// Query the configured list command (lpstat -e by default) for
/// available destinations
pub fn list_targets(command: &[String]) -> Result<Vec<PrintTarget>, ActionError> {
    let (program, args) = command
        .split_first()
        .context("print list command is empty")?;

    let output = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .output()
        .with_context(|| format!("failed to run `{program}`"))?;
    if !output.status.success() {
        return Err(ActionError::External {
            command: program.clone(),
            status: output.status,
        });
    }
    Ok(parse_targets(&String::from_utf8_lossy(&output.stdout)))
}

/// One destination per non-empty line
fn parse_targets(listing: &str) -> Vec<PrintTarget> {
    listing
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|name| PrintTarget {
            name: name.to_string(),
        })
        .collect()
}

/// Largest size with the source aspect ratio that fits the bounds
pub fn fit_size(src: (u32, u32), bounds: (u32, u32)) -> (u32, u32) {
    let (sw, sh) = (src.0 as u64, src.1 as u64);
    let (bw, bh) = (bounds.0 as u64, bounds.1 as u64);
    if sw == 0 || sh == 0 || bw == 0 || bh == 0 {
        return (0, 0);
    }
    if sw * bh >= sh * bw {
        (bw as u32, (sh * bw / sw) as u32)
    } else {
        ((sw * bh / sh) as u32, bh as u32)
    }
}

/// Render the image onto a white page, aspect-fit from the top-left corner
pub fn compose_page(image: &RgbaImage, page: PageGeometry) -> RgbaImage {
    let mut canvas = RgbaImage::from_pixel(page.width, page.height, PAGE_COLOR);
    let (w, h) = fit_size(image.dimensions(), (page.width, page.height));
    if w == 0 || h == 0 {
        return canvas;
    }
    let scaled = imageops::resize(image, w, h, FilterType::Triangle);
    imageops::overlay(&mut canvas, &scaled, 0, 0);
    canvas
}

/// Send a composed page to a destination by piping PNG into the spool
/// command, with "{target}" in the argv replaced by the destination name
pub fn spool(
    target: &PrintTarget,
    page: &RgbaImage,
    command: &[String],
) -> Result<(), ActionError> {
    let (program, args) = command
        .split_first()
        .context("print spool command is empty")?;
    let args = fill_target(args, &target.name);
    let png = encode_png(page)?;

    let mut child = Command::new(program)
        .args(&args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .with_context(|| format!("failed to run `{program}`"))?;
    if let Some(mut stdin) = child.stdin.take() {
        use std::io::Write;
        stdin
            .write_all(&png)
            .context("failed to pipe page to spooler")?;
    }
    let status = child
        .wait()
        .with_context(|| format!("failed to wait for `{program}`"))?;
    if !status.success() {
        return Err(ActionError::External {
            command: program.clone(),
            status,
        });
    }
    log::info!("Spooled {}x{} page to {}", page.width(), page.height(), target.name);
    Ok(())
}

fn fill_target(args: &[String], name: &str) -> Vec<String> {
    args.iter().map(|a| a.replace("{target}", name)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_targets_skips_blank_lines() {
        let targets = parse_targets("laser\n\n  inkjet \n");
        assert_eq!(targets.len(), 2);
        assert_eq!(targets[0].name, "laser");
        assert_eq!(targets[1].name, "inkjet");
    }

    #[test]
    fn test_fit_size_bounds_by_width_or_height() {
        let page = (2480, 3508);
        // Landscape source binds on width
        assert_eq!(fit_size((800, 600), page), (2480, 1860));
        // Tall-but-wider-than-page source still binds on width
        assert_eq!(fit_size((600, 800), page), (2480, 3306));
        // Exact page shape fills it
        assert_eq!(fit_size((2480, 3508), page), (2480, 3508));
        // Very tall source binds on height
        assert_eq!(fit_size((100, 10000), page), (35, 3508));
    }

    #[test]
    fn test_fit_size_degenerate_inputs() {
        assert_eq!(fit_size((0, 100), (2480, 3508)), (0, 0));
        assert_eq!(fit_size((100, 100), (0, 3508)), (0, 0));
    }

    #[test]
    fn test_compose_page_places_image_at_origin() {
        let red = RgbaImage::from_pixel(2, 1, Rgba([255, 0, 0, 255]));
        let page = compose_page(&red, PageGeometry { width: 8, height: 10 });

        assert_eq!(page.dimensions(), (8, 10));
        // Image scales to 8x4 anchored top-left, the rest stays white
        assert_eq!(*page.get_pixel(0, 0), Rgba([255, 0, 0, 255]));
        assert_eq!(*page.get_pixel(7, 3), Rgba([255, 0, 0, 255]));
        assert_eq!(*page.get_pixel(0, 4), PAGE_COLOR);
        assert_eq!(*page.get_pixel(7, 9), PAGE_COLOR);
    }

    #[test]
    fn test_fill_target_substitutes_placeholder() {
        let args = vec!["-P".to_string(), "{target}".to_string()];
        assert_eq!(fill_target(&args, "laser"), vec!["-P", "laser"]);
    }

    #[test]
    fn test_list_targets_runs_command() {
        let targets = list_targets(&["echo".to_string(), "laser".to_string()]).unwrap();
        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].name, "laser");
    }

    #[test]
    fn test_list_failure_surfaces_status() {
        let err = list_targets(&["false".to_string()]).unwrap_err();
        assert!(matches!(err, ActionError::External { .. }));
    }

    #[test]
    fn test_spool_pipes_page() {
        let page = RgbaImage::from_pixel(4, 4, PAGE_COLOR);
        let target = PrintTarget {
            name: "any".to_string(),
        };
        spool(&target, &page, &["cat".to_string()]).unwrap();
    }

    #[test]
    fn test_spool_failure_surfaces_status() {
        let page = RgbaImage::from_pixel(4, 4, PAGE_COLOR);
        let target = PrintTarget {
            name: "any".to_string(),
        };
        let command = vec![
            "sh".to_string(),
            "-c".to_string(),
            "cat >/dev/null; exit 3".to_string(),
        ];
        let err = spool(&target, &page, &command).unwrap_err();
        assert_eq!(err.to_string(), "`sh` failed with exit status: 3");
    }
}
