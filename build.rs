fn main() {
    // Forwards ESP-IDF sysenv to dependents when the espidf feature is
    // active; a no-op on host builds.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
