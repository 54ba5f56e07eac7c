use std::path::Path;

use alpha_threshold::gradient::save_gradient_image;
use alpha_threshold::{default_output_path, process_file, process_image, Error, ProcessOptions};
use image::{ImageBuffer, Rgb, RgbImage, Rgba, RgbaImage};

fn init_logs() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn write_alpha_row(path: &Path, alphas: &[u8]) {
    let width = u32::try_from(alphas.len()).unwrap();
    let mut img = RgbaImage::new(width, 1);
    for (x, &a) in alphas.iter().enumerate() {
        let x = u32::try_from(x).unwrap();
        img.put_pixel(x, 0, Rgba([200, 100, 50, a]));
    }
    img.save(path).unwrap();
}

#[test]
fn processes_png_and_writes_binary_alpha() {
    init_logs();
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("row.png");
    write_alpha_row(&input, &[0, 77, 127, 128, 255]);

    let report = process_image(&input, &ProcessOptions::default()).unwrap();
    assert_eq!(report.output, dir.path().join("row_processed.png"));
    assert!(report.translucent_before);
    assert!(!report.translucent_after);

    let out = image::open(&report.output).unwrap().to_rgba8();
    let alphas: Vec<u8> = out.pixels().map(|p| p[3]).collect();
    // 127/255 < 0.5 < 128/255
    assert_eq!(alphas, vec![0, 0, 0, 255, 255]);
    for p in out.pixels() {
        assert_eq!(&p.0[..3], &[200, 100, 50]);
    }
}

#[test]
fn already_binary_image_reports_no_translucency() {
    init_logs();
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("binary.png");
    write_alpha_row(&input, &[0, 255, 0, 255]);

    let output = dir.path().join("binary_out.png");
    let report = process_file(&input, &output, 0.3).unwrap();
    assert!(!report.translucent_before);
    assert!(!report.translucent_after);

    let out = image::open(&output).unwrap().to_rgba8();
    let alphas: Vec<u8> = out.pixels().map(|p| p[3]).collect();
    assert_eq!(alphas, vec![0, 255, 0, 255]);
}

#[test]
fn rgb_input_fails_without_output() {
    init_logs();
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("rgb.png");
    RgbImage::from_pixel(3, 3, Rgb([10, 20, 30]))
        .save(&input)
        .unwrap();

    let output = default_output_path(&input, "_processed");
    let err = process_file(&input, &output, 0.5).unwrap_err();
    assert!(matches!(err, Error::MissingAlphaChannel { channels: 3 }));
    assert!(!output.exists());
}

#[test]
fn out_of_range_threshold_fails_without_output() {
    init_logs();
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("row.png");
    write_alpha_row(&input, &[0, 128, 255]);
    let output = dir.path().join("row_processed.png");

    for bad in [1.5f32, -0.1] {
        let err = process_file(&input, &output, bad).unwrap_err();
        assert!(matches!(err, Error::InvalidThreshold(_)));
        assert!(!output.exists());
    }
}

#[test]
fn undecodable_input_is_a_decode_error() {
    init_logs();
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("garbage.png");
    std::fs::write(&input, b"not an image").unwrap();
    let output = dir.path().join("garbage_processed.png");

    let err = process_file(&input, &output, 0.5).unwrap_err();
    assert!(matches!(err, Error::Decode { .. }));
    assert!(!output.exists());
}

#[test]
fn sixteen_bit_png_keeps_its_depth() {
    init_logs();
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("deep.png");
    let mut img = ImageBuffer::<Rgba<u16>, Vec<u16>>::new(2, 1);
    img.put_pixel(0, 0, Rgba([1000, 2000, 3000, 30000]));
    img.put_pixel(1, 0, Rgba([4000, 5000, 6000, 40000]));
    img.save(&input).unwrap();

    let output = dir.path().join("deep_out.png");
    let report = process_file(&input, &output, 0.5).unwrap();
    assert!(report.translucent_before);

    let out = image::open(&output).unwrap();
    assert_eq!(out.color(), image::ColorType::Rgba16);
    let out = out.to_rgba16();
    assert_eq!(out.get_pixel(0, 0).0, [1000, 2000, 3000, 0]);
    assert_eq!(out.get_pixel(1, 0).0, [4000, 5000, 6000, 65535]);
}

#[test]
fn output_directory_is_created() {
    init_logs();
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("row.png");
    write_alpha_row(&input, &[10, 250]);

    let output = dir.path().join("nested").join("deeper").join("out.png");
    process_file(&input, &output, 0.5).unwrap();
    assert!(output.exists());
}

#[test]
fn gradient_demo_image_thresholds_at_the_requested_column() {
    init_logs();
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("gradient.png");
    save_gradient_image(&input, 64).unwrap();

    let report = process_file(&input, &dir.path().join("gradient_out.png"), 0.25).unwrap();
    assert!(report.translucent_before);
    assert!(!report.translucent_after);

    let out = image::open(&report.output).unwrap().to_rgba8();
    let first_opaque = (0..out.width())
        .find(|&x| out.get_pixel(x, 0)[3] == 255)
        .unwrap();
    // alpha = x / 63 quantized to 8 bits; x = 16 is the first above 0.25
    assert_eq!(first_opaque, 16);
    for y in 0..out.height() {
        for x in 0..out.width() {
            let expected = if x >= first_opaque { 255 } else { 0 };
            assert_eq!(out.get_pixel(x, y)[3], expected);
        }
    }
}

#[test]
fn rgb_jpeg_with_default_suffix_is_missing_alpha() {
    init_logs();
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("photo.jpg");
    RgbImage::from_pixel(4, 4, Rgb([90, 120, 150]))
        .save(&input)
        .unwrap();

    let err = process_image(&input, &ProcessOptions::default()).unwrap_err();
    assert!(matches!(err, Error::MissingAlphaChannel { channels: 3 }));
    assert!(!dir.path().join("photo_processed.jpg").exists());
}

#[test]
fn non_alpha_extension_gets_png_data() {
    init_logs();
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("row.png");
    write_alpha_row(&input, &[30, 220]);

    let output = dir.path().join("row_out.jpg");
    process_file(&input, &output, 0.5).unwrap();

    let out = image::ImageReader::open(&output)
        .unwrap()
        .with_guessed_format()
        .unwrap();
    assert_eq!(out.format(), Some(image::ImageFormat::Png));
    let out = out.decode().unwrap().to_rgba8();
    assert_eq!(out.get_pixel(0, 0)[3], 0);
    assert_eq!(out.get_pixel(1, 0)[3], 255);
}

#[cfg(target_os = "linux")]
#[test]
fn write_to_full_disk_fails_and_keeps_the_link() {
    init_logs();
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("row.png");
    write_alpha_row(&input, &[0, 128, 255]);

    let output = dir.path().join("row_processed.png");
    std::os::unix::fs::symlink("/dev/full", &output).unwrap();

    let err = process_file(&input, &output, 0.5).unwrap_err();
    assert!(matches!(err, Error::Encode { .. }));
    assert!(output.symlink_metadata().is_ok());
}

#[test]
fn file_in_place_of_parent_dir_fails_to_encode() {
    init_logs();
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("row.png");
    write_alpha_row(&input, &[0, 255]);

    std::fs::write(dir.path().join("fresh"), b"a file, not a dir").unwrap();
    let output = dir.path().join("fresh").join("out.png");

    let err = process_file(&input, &output, 0.5).unwrap_err();
    assert!(matches!(err, Error::Encode { .. }));
    assert!(dir.path().join("fresh").is_file());
}

#[test]
fn pre_existing_output_survives_failed_write() {
    init_logs();
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("row.png");
    write_alpha_row(&input, &[0, 200]);

    let output = dir.path().join("existing.png");
    std::fs::create_dir(&output).unwrap();
    std::fs::write(output.join("inside.txt"), b"keep me").unwrap();

    let err = process_file(&input, &output, 0.5).unwrap_err();
    assert!(matches!(err, Error::Encode { .. }));
    assert_eq!(std::fs::read(output.join("inside.txt")).unwrap(), b"keep me");
}
