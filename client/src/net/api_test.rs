use super::*;
use crate::state::slot::SelectedFile;

fn form_file(name: &str, content_type: &str) -> FormFile {
    FormFile {
        field: "carImage",
        file: SelectedFile { name: name.into(), content_type: content_type.into(), bytes: vec![1, 2] },
    }
}

#[test]
fn part_type_keeps_declared_type() {
    assert_eq!(part_type(&form_file("car.png", "image/png")), "image/png");
}

#[test]
fn part_type_defaults_blank_to_jpeg() {
    assert_eq!(part_type(&form_file("car", "  ")), "image/jpeg");
}

#[test]
fn part_filename_falls_back_to_field() {
    assert_eq!(part_filename(&form_file("car.png", "image/png")), "car.png");
    assert_eq!(part_filename(&form_file("", "image/png")), "carImage");
}

#[test]
fn transport_failed_message_prefixes_detail() {
    assert_eq!(transport_failed_message("network down"), "Failed to transform image: network down");
}
