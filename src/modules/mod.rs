pub mod books;

use bookstore_kernel::ModuleRegistry;

use books::store::SharedBookStore;

/// Register all application modules with the registry
pub fn register_all(registry: &mut ModuleRegistry, store: SharedBookStore) {
    registry.register(books::create_module(store));
}
