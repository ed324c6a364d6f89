pub mod load_facts;

pub use load_facts::LoadFactsUseCase;
