fn main() {
    println!("cargo:rerun-if-env-changed=YESNO_WIFI_SSID");
    println!("cargo:rerun-if-env-changed=YESNO_WIFI_PASSWORD");
    println!("cargo:rerun-if-env-changed=YESNO_POLL_INTERVAL_SECS");
    println!("cargo:rerun-if-env-changed=YESNO_STATUS_URL");

    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
