// Content type resolution tests

use brewcache::content_type::resolve;

#[test]
fn test_extension_overrides_apply_to_scripts_and_styles() {
    assert_eq!(resolve(b"const a = 1;", "bundle.js"), "text/javascript");
    assert_eq!(resolve(b".a { color: red }", "site.css"), "text/css");
}

#[test]
fn test_png_is_sniffed_regardless_of_name() {
    let png = [0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 0, 0, 0, 0x0d];
    assert_eq!(resolve(&png, "upload.bin"), "image/png");
}

#[test]
fn test_unknown_binary_is_octet_stream() {
    assert_eq!(
        resolve(&[0x00, 0xff, 0x13, 0x37, 0x00], "blob"),
        "application/octet-stream"
    );
}
