fn main() {
    alien_hunter_ar::game::run();
}
