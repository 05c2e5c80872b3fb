//! Initial catalog loaded at startup.

use rust_decimal::Decimal;
use sr_robot_core::{Discount, Price, Product, ProductId};

/// Row of the seed table: id, name, category, price, discount %, rating,
/// reviews, in stock, featured, description.
type SeedRow = (
    &'static str,
    &'static str,
    &'static str,
    u32,
    u32,
    f64,
    u32,
    bool,
    bool,
    &'static str,
);

const IMAGE_BASE: &str = "https://img.srrobot.com/products";

const ROWS: &[SeedRow] = &[
    (
        "1",
        "Audífonos Bluetooth Pro",
        "Audio",
        159,
        20,
        4.8,
        324,
        true,
        true,
        "Cancelación activa de ruido y 30 horas de batería",
    ),
    (
        "2",
        "Parlante Portátil Waterproof",
        "Audio",
        129,
        0,
        4.5,
        187,
        true,
        false,
        "Resistente al agua IPX7 con sonido 360°",
    ),
    (
        "3",
        "Mouse Gamer RGB",
        "Mouse",
        89,
        10,
        4.7,
        412,
        true,
        true,
        "Sensor óptico de 16000 DPI y 7 botones programables",
    ),
    (
        "4",
        "Mouse Inalámbrico Ergonómico",
        "Mouse",
        59,
        0,
        4.3,
        95,
        false,
        false,
        "Diseño vertical que reduce la tensión de la muñeca",
    ),
    (
        "5",
        "Teclado Mecánico RGB",
        "Teclados",
        249,
        15,
        4.9,
        276,
        true,
        true,
        "Switches azules intercambiables y retroiluminación por tecla",
    ),
    (
        "6",
        "Teclado Inalámbrico Slim",
        "Teclados",
        119,
        0,
        4.2,
        64,
        true,
        false,
        "Perfil bajo con conexión a tres dispositivos",
    ),
    (
        "7",
        "Cable USB-C Trenzado 2m",
        "Cables",
        29,
        0,
        4.6,
        530,
        true,
        false,
        "Carga rápida de 100W y transferencia de datos",
    ),
    (
        "8",
        "Hub USB-C 7 en 1",
        "Cables",
        139,
        25,
        4.4,
        142,
        true,
        false,
        "HDMI 4K, lector de tarjetas y tres puertos USB 3.0",
    ),
    (
        "9",
        "Cargador Inalámbrico 15W",
        "Cargadores",
        79,
        0,
        4.1,
        88,
        false,
        false,
        "Compatible con Qi para teléfonos y audífonos",
    ),
    (
        "10",
        "Power Bank 20000mAh",
        "Cargadores",
        99,
        10,
        4.7,
        301,
        true,
        true,
        "Dos salidas USB y pantalla de nivel de carga",
    ),
    (
        "11",
        "Smartwatch Deportivo",
        "Wearables",
        299,
        30,
        4.5,
        158,
        true,
        true,
        "Monitor de ritmo cardiaco, GPS y resistencia al agua",
    ),
    (
        "12",
        "Soporte para Laptop Ajustable",
        "Accesorios",
        69,
        0,
        4.4,
        73,
        true,
        false,
        "Aluminio con seis niveles de altura",
    ),
];

/// The seed catalog, in display order.
#[must_use]
pub fn catalog() -> Vec<Product> {
    ROWS.iter().map(product_from_row).collect()
}

fn product_from_row(row: &SeedRow) -> Product {
    let (id, name, category, price, discount, rating, reviews, in_stock, featured, description) =
        *row;
    let price = Price::from_units(price);
    let discount = Discount::new(Decimal::from(discount))
        .ok()
        .filter(Discount::is_effective);

    Product {
        id: ProductId::new(id),
        name: name.to_string(),
        description: description.to_string(),
        category: category.to_string(),
        price,
        original_price: discount.and_then(|d| d.original_price_for(price)),
        discount,
        image: format!("{IMAGE_BASE}/{id}.jpg"),
        rating,
        reviews,
        in_stock,
        featured,
    }
}
