//! The embedded C99 runtime-support module, linked into every generated
//! program. Grounded on `original_source/runtime/basic_runtime.h`'s API
//! surface (the function names below match it one-for-one) but reworked
//! into idiomatic C99: a tagged union replaces `std::variant`, a linear
//! binding table replaces `std::map`, and free functions replace the
//! `basic_runtime` namespace.
//!
//! Arrays are 1-based internally (spec §9(a)): `get_array_element`/
//! `set_array_element` subtract one from each supplied index before
//! computing the flat offset, matching `BasicArray::at()`.

/// Emitted once at the top of every generated `.c` file.
pub const PRELUDE: &str = r#"
#include <ctype.h>
#include <stdio.h>
#include <stdlib.h>
#include <stdbool.h>
#include <stdint.h>
#include <string.h>
#include <math.h>
#include <time.h>

/* strict -std=c99 hides M_PI and strdup (both POSIX/GNU extensions, not ISO C). */
#define BASIC_PI 3.14159265358979323846

static char *basic_strdup(const char *s) {
    size_t len = strlen(s) + 1;
    char *copy = malloc(len);
    if (copy != NULL) {
        memcpy(copy, s, len);
    }
    return copy;
}

typedef enum {
    BV_INT,
    BV_DOUBLE,
    BV_STRING,
    BV_BOOL,
    BV_STRUCT,
    BV_ARRAY,
    BV_NULL,
} BasicTag;

typedef struct BasicValue BasicValue;
typedef struct BasicArray BasicArray;
typedef struct BasicStruct BasicStruct;

struct BasicArray {
    int64_t *dimensions;
    size_t ndim;
    BasicValue *elements;
    size_t count;
};

struct BasicStruct {
    char *type_name;
    char **field_names;
    BasicValue *field_values;
    size_t field_count;
};

struct BasicValue {
    BasicTag tag;
    union {
        int64_t i;
        double d;
        char *s;
        bool b;
        BasicArray *arr;
        BasicStruct *rec;
    } as;
};

static BasicValue bv_int(int64_t v) { BasicValue r; r.tag = BV_INT; r.as.i = v; return r; }
static BasicValue bv_double(double v) { BasicValue r; r.tag = BV_DOUBLE; r.as.d = v; return r; }
static BasicValue bv_bool(bool v) { BasicValue r; r.tag = BV_BOOL; r.as.b = v; return r; }
static BasicValue bv_string(const char *v) { BasicValue r; r.tag = BV_STRING; r.as.s = basic_strdup(v); return r; }
static BasicValue bv_null(void) { BasicValue r; r.tag = BV_NULL; r.as.i = 0; return r; }
static BasicValue bv_array(BasicArray *arr) { BasicValue r; r.tag = BV_ARRAY; r.as.arr = arr; return r; }
static BasicValue bv_struct(BasicStruct *rec) { BasicValue r; r.tag = BV_STRUCT; r.as.rec = rec; return r; }

/* ---- variable bindings: one flat table per frame, mirrors
 * braic_eval::Environment (innermost frame wins, else global). ---- */

typedef struct { char *name; BasicValue value; } BasicBinding;

typedef struct {
    BasicBinding *bindings;
    size_t count;
    size_t capacity;
} BasicEnv;

static void env_init(BasicEnv *env) {
    env->bindings = NULL;
    env->count = 0;
    env->capacity = 0;
}

static BasicValue *env_find(BasicEnv *env, const char *name) {
    if (!env) return NULL;
    for (size_t i = 0; i < env->count; i++) {
        if (strcmp(env->bindings[i].name, name) == 0) {
            return &env->bindings[i].value;
        }
    }
    return NULL;
}

static void env_put(BasicEnv *env, const char *name, BasicValue value) {
    BasicValue *existing = env_find(env, name);
    if (existing) {
        *existing = value;
        return;
    }
    if (env->count == env->capacity) {
        env->capacity = env->capacity == 0 ? 8 : env->capacity * 2;
        env->bindings = realloc(env->bindings, env->capacity * sizeof(BasicBinding));
    }
    env->bindings[env->count].name = basic_strdup(name);
    env->bindings[env->count].value = value;
    env->count++;
}

/* Innermost frame wins; else global; matches Environment::get. */
static BasicValue env_get(BasicEnv *locals, BasicEnv *globals, const char *name) {
    BasicValue *v = env_find(locals, name);
    if (v) return *v;
    v = env_find(globals, name);
    if (v) return *v;
    return bv_int(0);
}

/* Update in whichever frame already declares the name; else declare in
 * the current frame, or globals if there is no current frame. Matches
 * Environment::set. */
static void env_set(BasicEnv *locals, BasicEnv *globals, const char *name, BasicValue value) {
    if (locals && env_find(locals, name)) { env_put(locals, name, value); return; }
    if (env_find(globals, name)) { env_put(globals, name, value); return; }
    if (locals) { env_put(locals, name, value); return; }
    env_put(globals, name, value);
}

/* ---- type coercion ---- */

static int64_t to_int(BasicValue v) {
    switch (v.tag) {
        case BV_INT: return v.as.i;
        case BV_DOUBLE: return (int64_t)v.as.d;
        case BV_BOOL: return v.as.b ? 1 : 0;
        case BV_STRING: return strtoll(v.as.s, NULL, 10);
        default: return 0;
    }
}

static double to_double(BasicValue v) {
    switch (v.tag) {
        case BV_INT: return (double)v.as.i;
        case BV_DOUBLE: return v.as.d;
        case BV_BOOL: return v.as.b ? 1.0 : 0.0;
        case BV_STRING: return strtod(v.as.s, NULL);
        default: return 0.0;
    }
}

static bool to_bool(BasicValue v) {
    switch (v.tag) {
        case BV_BOOL: return v.as.b;
        case BV_INT: return v.as.i != 0;
        case BV_DOUBLE: return v.as.d != 0.0;
        case BV_STRING: return v.as.s != NULL && v.as.s[0] != '\0';
        case BV_NULL: return false;
        default: return true;
    }
}

static char *to_cstring(BasicValue v) {
    char buf[64];
    switch (v.tag) {
        case BV_STRING: return v.as.s;
        case BV_INT: snprintf(buf, sizeof buf, "%lld", (long long)v.as.i); return basic_strdup(buf);
        case BV_DOUBLE: snprintf(buf, sizeof buf, "%g", v.as.d); return basic_strdup(buf);
        case BV_BOOL: return basic_strdup(v.as.b ? "true" : "false");
        case BV_NULL: return basic_strdup("null");
        default: return basic_strdup("");
    }
}

static bool is_double_valued(BasicValue v) { return v.tag == BV_DOUBLE; }

/* ---- arithmetic: numeric ops promote to double if either side is a
 * double, matching braic_value::arith's coercion rule. ---- */

static BasicValue add(BasicValue a, BasicValue b) {
    if (a.tag == BV_STRING || b.tag == BV_STRING) {
        char *as = to_cstring(a);
        char *bs = to_cstring(b);
        size_t len = strlen(as) + strlen(bs) + 1;
        char *joined = malloc(len);
        snprintf(joined, len, "%s%s", as, bs);
        BasicValue r = bv_string(joined);
        free(joined);
        return r;
    }
    if (is_double_valued(a) || is_double_valued(b)) return bv_double(to_double(a) + to_double(b));
    return bv_int(to_int(a) + to_int(b));
}

static BasicValue subtract(BasicValue a, BasicValue b) {
    if (is_double_valued(a) || is_double_valued(b)) return bv_double(to_double(a) - to_double(b));
    return bv_int(to_int(a) - to_int(b));
}

static BasicValue multiply(BasicValue a, BasicValue b) {
    if (is_double_valued(a) || is_double_valued(b)) return bv_double(to_double(a) * to_double(b));
    return bv_int(to_int(a) * to_int(b));
}

static BasicValue divide(BasicValue a, BasicValue b) {
    if (is_double_valued(a) || is_double_valued(b)) return bv_double(to_double(a) / to_double(b));
    int64_t denom = to_int(b);
    if (denom == 0) {
        fprintf(stderr, "runtime error: division by zero\n");
        exit(1);
    }
    return bv_int(to_int(a) / denom);
}

static BasicValue mod_val(BasicValue a, BasicValue b) {
    if (is_double_valued(a) || is_double_valued(b)) return bv_double(fmod(to_double(a), to_double(b)));
    int64_t denom = to_int(b);
    if (denom == 0) {
        fprintf(stderr, "runtime error: modulo by zero\n");
        exit(1);
    }
    return bv_int(to_int(a) % denom);
}

static BasicValue pow_val(BasicValue a, BasicValue b) { return bv_double(pow(to_double(a), to_double(b))); }

static BasicValue equal(BasicValue a, BasicValue b) {
    if (a.tag == BV_STRING && b.tag == BV_STRING) return bv_bool(strcmp(a.as.s, b.as.s) == 0);
    return bv_bool(to_double(a) == to_double(b));
}
static BasicValue not_equal(BasicValue a, BasicValue b) { return bv_bool(!to_bool(equal(a, b))); }
static BasicValue less_than(BasicValue a, BasicValue b) { return bv_bool(to_double(a) < to_double(b)); }
static BasicValue less_equal(BasicValue a, BasicValue b) { return bv_bool(to_double(a) <= to_double(b)); }
static BasicValue greater_than(BasicValue a, BasicValue b) { return bv_bool(to_double(a) > to_double(b)); }
static BasicValue greater_equal(BasicValue a, BasicValue b) { return bv_bool(to_double(a) >= to_double(b)); }

static BasicValue negate(BasicValue a) {
    if (is_double_valued(a)) return bv_double(-to_double(a));
    return bv_int(-to_int(a));
}
static BasicValue logical_not(BasicValue a) { return bv_bool(!to_bool(a)); }

/* ---- single/two/zero-argument built-ins, named per original_source's
 * basic_runtime and braic_eval::builtins. ---- */

static BasicValue sqrt_val(BasicValue a) { return bv_double(sqrt(to_double(a))); }
static BasicValue abs_val(BasicValue a) { return a.tag == BV_DOUBLE ? bv_double(fabs(a.as.d)) : bv_int(llabs(to_int(a))); }
static BasicValue sin_val(BasicValue a) { return bv_double(sin(to_double(a))); }
static BasicValue cos_val(BasicValue a) { return bv_double(cos(to_double(a))); }
static BasicValue tan_val(BasicValue a) { return bv_double(tan(to_double(a))); }
static BasicValue asin_val(BasicValue a) { return bv_double(asin(to_double(a))); }
static BasicValue acos_val(BasicValue a) { return bv_double(acos(to_double(a))); }
static BasicValue atan_val(BasicValue a) { return bv_double(atan(to_double(a))); }
static BasicValue log_val(BasicValue a) { return bv_double(log(to_double(a))); }
static BasicValue log10_val(BasicValue a) { return bv_double(log10(to_double(a))); }
static BasicValue exp_val(BasicValue a) { return bv_double(exp(to_double(a))); }
static BasicValue floor_val(BasicValue a) { return bv_double(floor(to_double(a))); }
static BasicValue ceil_val(BasicValue a) { return bv_double(ceil(to_double(a))); }
static BasicValue round_val(BasicValue a) { return bv_double(round(to_double(a))); }
static BasicValue int_val(BasicValue a) { return bv_int(to_int(a)); }

static BasicValue atan2_val(BasicValue a, BasicValue b) { return bv_double(atan2(to_double(a), to_double(b))); }
static BasicValue pi_val(void) { return bv_double(BASIC_PI); }

static uint64_t rnd_state = 0;
static BasicValue rnd(void) {
    if (rnd_state == 0) rnd_state = (uint64_t)time(NULL) | 1;
    rnd_state ^= rnd_state << 13;
    rnd_state ^= rnd_state >> 7;
    rnd_state ^= rnd_state << 17;
    return bv_double((double)(rnd_state >> 11) / (double)(1ULL << 53));
}

static BasicValue len_val(BasicValue a) { char *s = to_cstring(a); return bv_int((int64_t)strlen(s)); }
static BasicValue upper_val(BasicValue a) {
    char *s = basic_strdup(to_cstring(a));
    for (char *p = s; *p; p++) *p = (char)toupper((unsigned char)*p);
    BasicValue r = bv_string(s);
    free(s);
    return r;
}
static BasicValue lower_val(BasicValue a) {
    char *s = basic_strdup(to_cstring(a));
    for (char *p = s; *p; p++) *p = (char)tolower((unsigned char)*p);
    BasicValue r = bv_string(s);
    free(s);
    return r;
}
static BasicValue left_val(BasicValue a, BasicValue n) {
    char *s = to_cstring(a);
    int64_t count = to_int(n);
    size_t len = strlen(s);
    size_t take = count < 0 ? 0 : (size_t)count;
    if (take > len) take = len;
    char *out = malloc(take + 1);
    memcpy(out, s, take);
    out[take] = '\0';
    BasicValue r = bv_string(out);
    free(out);
    return r;
}
static BasicValue right_val(BasicValue a, BasicValue n) {
    char *s = to_cstring(a);
    int64_t count = to_int(n);
    size_t len = strlen(s);
    size_t take = count < 0 ? 0 : (size_t)count;
    if (take > len) take = len;
    BasicValue r = bv_string(s + (len - take));
    return r;
}
/* 1-based start, matches braic_eval::builtins::mid_from. */
static BasicValue mid_val(BasicValue a, BasicValue start, BasicValue length, bool has_length) {
    char *s = to_cstring(a);
    size_t len = strlen(s);
    int64_t start1 = to_int(start);
    size_t from = start1 < 1 ? 0 : (size_t)(start1 - 1);
    if (from > len) from = len;
    size_t take = has_length ? (to_int(length) < 0 ? 0 : (size_t)to_int(length)) : (len - from);
    if (from + take > len) take = len - from;
    char *out = malloc(take + 1);
    memcpy(out, s + from, take);
    out[take] = '\0';
    BasicValue r = bv_string(out);
    free(out);
    return r;
}
static BasicValue chr_val(BasicValue a) { char buf[2] = { (char)to_int(a), '\0' }; return bv_string(buf); }
static BasicValue asc_val(BasicValue a) { char *s = to_cstring(a); return bv_int(s[0]); }
static BasicValue str_val(BasicValue a) { return bv_string(to_cstring(a)); }
static BasicValue val_val(BasicValue a) {
    if (a.tag != BV_STRING) return a;
    char *s = a.as.s;
    if (strchr(s, '.')) return bv_double(strtod(s, NULL));
    return bv_int(strtoll(s, NULL, 10));
}

/* ---- I/O ---- */

static void print(BasicValue v) { char *s = to_cstring(v); fputs(s, stdout); }
static void print_line(void) { fputc('\n', stdout); }
static BasicValue input(void) {
    char buf[4096];
    if (!fgets(buf, sizeof buf, stdin)) return bv_string("");
    size_t n = strlen(buf);
    if (n > 0 && buf[n - 1] == '\n') buf[n - 1] = '\0';
    return bv_string(buf);
}

/* ---- arrays: 1-based indices, matching BasicArray::at(). ---- */

static BasicValue create_array(int64_t *dims, size_t ndim) {
    BasicArray *arr = malloc(sizeof(BasicArray));
    arr->ndim = ndim;
    arr->dimensions = malloc(ndim * sizeof(int64_t));
    size_t count = 1;
    for (size_t i = 0; i < ndim; i++) {
        arr->dimensions[i] = dims[i];
        count *= (size_t)dims[i];
    }
    arr->count = count;
    arr->elements = calloc(count, sizeof(BasicValue));
    for (size_t i = 0; i < count; i++) arr->elements[i] = bv_int(0);
    return bv_array(arr);
}

static size_t flat_index(BasicArray *arr, int64_t *indices) {
    size_t offset = 0;
    size_t multiplier = 1;
    for (size_t i = 0; i < arr->ndim; i++) {
        offset += (size_t)(indices[i] - 1) * multiplier;
        multiplier *= (size_t)arr->dimensions[i];
    }
    return offset;
}

static BasicValue get_array_element(BasicValue array, int64_t *indices) {
    BasicArray *arr = array.as.arr;
    size_t idx = flat_index(arr, indices);
    if (idx >= arr->count) {
        fprintf(stderr, "runtime error: array index out of bounds\n");
        exit(1);
    }
    return arr->elements[idx];
}

static void set_array_element(BasicValue array, int64_t *indices, BasicValue value) {
    BasicArray *arr = array.as.arr;
    size_t idx = flat_index(arr, indices);
    if (idx >= arr->count) {
        fprintf(stderr, "runtime error: array index out of bounds\n");
        exit(1);
    }
    arr->elements[idx] = value;
}

/* ---- structs ---- */

static BasicValue create_struct(const char *type_name, char **field_names, BasicValue *values, size_t field_count) {
    BasicStruct *rec = malloc(sizeof(BasicStruct));
    rec->type_name = basic_strdup(type_name);
    rec->field_count = field_count;
    rec->field_names = malloc(field_count * sizeof(char *));
    rec->field_values = malloc(field_count * sizeof(BasicValue));
    for (size_t i = 0; i < field_count; i++) {
        rec->field_names[i] = basic_strdup(field_names[i]);
        rec->field_values[i] = values[i];
    }
    return bv_struct(rec);
}

static BasicValue get_struct_field(BasicValue value, const char *field) {
    BasicStruct *rec = value.as.rec;
    for (size_t i = 0; i < rec->field_count; i++) {
        if (strcmp(rec->field_names[i], field) == 0) return rec->field_values[i];
    }
    fprintf(stderr, "runtime error: unknown field '%s' on struct '%s'\n", field, rec->type_name);
    exit(1);
}

static void set_struct_field(BasicValue value, const char *field, BasicValue new_value) {
    BasicStruct *rec = value.as.rec;
    for (size_t i = 0; i < rec->field_count; i++) {
        if (strcmp(rec->field_names[i], field) == 0) { rec->field_values[i] = new_value; return; }
    }
    fprintf(stderr, "runtime error: unknown field '%s' on struct '%s'\n", field, rec->type_name);
    exit(1);
}
"#;
