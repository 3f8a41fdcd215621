use geco_calc::adapters::catalog::{
    builtin_catalog, CatalogSource, FallbackCatalog, RemoteCsvCatalog,
};
use geco_calc::domain::ports::CatalogProvider;
use geco_calc::Category;
use httpmock::prelude::*;

const DETERGENT_CSV: &str = "\
Detergentes,,,,
Marca,Nombre,Tipo,Litros,Precio
Roma,Multiusos,Polvo,1,28.50
Foca,Biodegradable,Polvo,5,115
";

const ENHANCER_CSV: &str = "\
Potenciadores,,,,,
#,Marca,Nombre,Tipo,Litros,Precio
1,Vanish,Oxi Action,Polvo,0.9,119
";

#[tokio::test]
async fn test_remote_catalog_fetches_available_files() {
    let server = MockServer::start();

    let detergents = server.mock(|when, then| {
        when.method(GET).path("/catalog/Detergentes.csv");
        then.status(200)
            .header("Content-Type", "text/csv")
            .body(DETERGENT_CSV);
    });
    let enhancers = server.mock(|when, then| {
        when.method(GET).path("/catalog/Potenciadores.csv");
        then.status(200).body(ENHANCER_CSV);
    });
    let stain_removers = server.mock(|when, then| {
        when.method(GET).path("/catalog/Desmanchadores.csv");
        then.status(500);
    });

    let catalog = RemoteCsvCatalog::new(&server.url("/catalog")).unwrap();
    let entries = catalog.load().await.unwrap();

    detergents.assert();
    enhancers.assert();
    stain_removers.assert();

    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0].brand, "Roma");
    assert_eq!(entries[1].price, 115.0);
    assert_eq!(entries[2].brand, "Vanish");
    assert_eq!(entries[2].category, Category::Enhancer);
}

#[tokio::test]
async fn test_remote_catalog_falls_back_when_server_has_nothing() {
    let server = MockServer::start();
    let failing = server.mock(|when, then| {
        when.method(GET);
        then.status(503);
    });

    let catalog = FallbackCatalog::new(RemoteCsvCatalog::new(&server.url("/catalog")).unwrap());
    let entries = catalog.load().await.unwrap();

    assert!(failing.hits() >= 1);
    assert_eq!(entries, builtin_catalog());
}

#[tokio::test]
async fn test_catalog_source_remote() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/Detergentes.csv");
        then.status(200).body(DETERGENT_CSV);
    });

    let entries = CatalogSource::Remote(server.base_url())
        .load()
        .await
        .unwrap();
    assert_eq!(entries.len(), 2);
}
