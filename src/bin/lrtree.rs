fn main() {
    lrtree::cli::run();
}
