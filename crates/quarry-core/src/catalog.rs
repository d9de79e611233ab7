//! Entity names, column names and default source layouts for the two
//! shipped pipelines. Readers and transformers both refer to these.

use crate::schema::SourceSpec;

pub mod retail {
    pub const DEPARTMENTS: &str = "departments";
    pub const CATEGORIES: &str = "categories";
    pub const CUSTOMERS: &str = "customers";
    pub const PRODUCTS: &str = "products";
    pub const ORDERS: &str = "orders";
    pub const ORDER_ITEMS: &str = "order_items";

    /// Parents before children.
    pub const LOAD_ORDER: [&str; 6] = [
        DEPARTMENTS,
        CATEGORIES,
        CUSTOMERS,
        PRODUCTS,
        ORDERS,
        ORDER_ITEMS,
    ];

    pub const DEPARTMENT_COLUMNS: [&str; 2] = ["department_id", "department_name"];
    pub const CATEGORY_COLUMNS: [&str; 3] =
        ["category_id", "category_department_id", "category_name"];
    pub const CUSTOMER_COLUMNS: [&str; 9] = [
        "customer_id",
        "customer_fname",
        "customer_lname",
        "customer_email",
        "customer_password",
        "customer_street",
        "customer_city",
        "customer_state",
        "customer_zipcode",
    ];
    pub const PRODUCT_COLUMNS: [&str; 6] = [
        "product_id",
        "product_category_id",
        "product_name",
        "product_description",
        "product_price",
        "product_image",
    ];
    pub const ORDER_COLUMNS: [&str; 4] =
        ["order_id", "order_date", "order_customer_id", "order_status"];
    pub const ORDER_ITEM_COLUMNS: [&str; 6] = [
        "order_item_id",
        "order_item_order_id",
        "order_item_product_id",
        "order_item_quantity",
        "order_item_subtotal",
        "order_item_product_price",
    ];
}

pub mod warehouse {
    pub const MOVIE_AWARDS: &str = "movie_awards";
    pub const MOVIES_QUERY: &str = "movies";
    pub const USERS: &str = "users";

    pub const DIM_MOVIE: &str = "dimMovie";
    pub const DIM_USER: &str = "dimUser";
    pub const FACT_WATCHS: &str = "FactWatchs";

    /// Dimensions before the fact table that references them.
    pub const LOAD_ORDER: [&str; 3] = [DIM_MOVIE, DIM_USER, FACT_WATCHS];

    pub const MOVIE_ID: &str = "movieID";
    pub const USER_ID: &str = "userID";

    pub const AWARD_ID: &str = "IdAward";
    /// Award name as spelled in the source file header.
    pub const AWARD_RAW: &str = "Aware";
    pub const AWARD: &str = "Award";
    pub const AWARD_COLUMNS: [&str; 3] = [MOVIE_ID, AWARD_ID, AWARD_RAW];

    /// Columns the movie query must return, in order.
    pub const MOVIE_COLUMNS: [&str; 6] = [
        MOVIE_ID,
        "title",
        "releaseDate",
        "gender",
        "participantName",
        "roleparticipant",
    ];
    pub const RELEASE_MOVIE: &str = "releaseMovie";
    pub const AWARD_MOVIE: &str = "awardMovie";

    pub const USER_RAW_ID: &str = "idUser";
    pub const USER_COLUMNS: [&str; 4] = [USER_RAW_ID, "username", "country", "subscription"];

    pub const DEFAULT_MOVIES_QUERY: &str = "SELECT \
        movie.movieID AS movieID, \
        movie.movieTitle AS title, \
        movie.releaseDate AS releaseDate, \
        gender.name AS gender, \
        person.name AS participantName, \
        participant.participantRole AS roleparticipant \
        FROM movie \
        INNER JOIN participant ON movie.movieID = participant.movieID \
        INNER JOIN person ON person.personID = participant.personID \
        INNER JOIN movie_gender ON movie.movieID = movie_gender.movieID \
        INNER JOIN gender ON movie_gender.genderID = gender.genderID";
}

pub(crate) fn retail_sources() -> Vec<(&'static str, SourceSpec)> {
    use retail::*;
    vec![
        (
            DEPARTMENTS,
            SourceSpec::headerless("data/departments", '|', &DEPARTMENT_COLUMNS),
        ),
        (
            CATEGORIES,
            SourceSpec::headerless("data/categories", '|', &CATEGORY_COLUMNS),
        ),
        (
            CUSTOMERS,
            SourceSpec::headerless("data/customers", '|', &CUSTOMER_COLUMNS),
        ),
        (
            PRODUCTS,
            SourceSpec::headerless("data/products", '|', &PRODUCT_COLUMNS),
        ),
        (
            ORDERS,
            SourceSpec::headerless("data/orders", '|', &ORDER_COLUMNS),
        ),
        (
            ORDER_ITEMS,
            SourceSpec::headerless("data/order_items", '|', &ORDER_ITEM_COLUMNS),
        ),
    ]
}

pub(crate) fn warehouse_sources() -> Vec<(&'static str, SourceSpec)> {
    use warehouse::*;
    vec![
        (
            MOVIE_AWARDS,
            SourceSpec::with_header("data/Awards_movie.csv", ',').with_columns(&AWARD_COLUMNS),
        ),
        (
            USERS,
            SourceSpec::with_header("data/users.csv", '|').with_columns(&USER_COLUMNS),
        ),
    ]
}
