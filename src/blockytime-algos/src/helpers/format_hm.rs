pub trait FormatHM {
    fn format_hm(&self) -> String;
}

/// Hours, possibly past 24 for normalized night times.
impl FormatHM for f64 {
    fn format_hm(&self) -> String {
        let minutes = (self * 60.0).round() as i64;
        let minutes = minutes.rem_euclid(1440);
        format!("{:02}:{:02}", minutes / 60, minutes % 60)
    }
}
