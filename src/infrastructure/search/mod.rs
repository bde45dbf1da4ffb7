mod azure_search_client;

pub use azure_search_client::AzureSearchClient;
