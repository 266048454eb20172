fn main() {
    std::process::exit(i32::from(reqgate::run()));
}
